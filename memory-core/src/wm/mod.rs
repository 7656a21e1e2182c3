//! Working-memory buffers (C9): phonological loop, visuospatial sketchpad,
//! episodic buffer. Each is a capacity-limited, time-decaying set; see
//! [`decay`] for the shared decay formula.

pub mod decay;
pub mod episodic_buffer;
pub mod phonological;
pub mod visuospatial;

pub use decay::{current_activation, is_decayed, item_activation, DECAY_FLOOR};
pub use episodic_buffer::EpisodicBuffer;
pub use phonological::PhonologicalLoop;
pub use visuospatial::VisuospatialSketchpad;
