use serde::{Deserialize, Serialize};

/// Weights for the four saliency subfactors. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaliencyWeights {
    pub frequency: f32,
    pub recency: f32,
    pub relevance: f32,
    pub surprise: f32,
}

impl Default for SaliencyWeights {
    fn default() -> Self {
        Self {
            frequency: 0.30,
            recency: 0.30,
            relevance: 0.25,
            surprise: 0.15,
        }
    }
}

/// Crate-wide configuration, covering every option named in spec §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL for the default HTTP embedding provider.
    pub embedder_url: Option<String>,
    /// Fixed embedding dimension enforced by the store kernel.
    pub embedding_dim: usize,
    /// Base decay rate (1/s) for working-memory activation.
    pub wm_decay_rate: f32,
    /// Phonological loop capacity.
    pub wm_phonological_capacity: usize,
    /// Visuospatial sketchpad capacity.
    pub wm_visuospatial_capacity: usize,
    /// Episodic buffer capacity.
    pub wm_episodic_buffer_capacity: usize,
    /// Inhibition half-life, in seconds.
    pub inhibition_half_life_s: i64,
    /// Saliency subfactor weights.
    pub saliency_weights: SaliencyWeights,
    /// Surprise-boundary threshold.
    pub surprise_threshold: f32,
    /// Max events considered per pipeline invocation.
    pub pipeline_event_limit: usize,
    /// Semantic-vs-spatial weight in the retrieval engine's combined score.
    pub retrieval_combined_semantic_weight: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedder_url: None,
            embedding_dim: 384,
            wm_decay_rate: crate::types::constants::DEFAULT_WM_DECAY_RATE,
            wm_phonological_capacity: 7,
            wm_visuospatial_capacity: 7,
            wm_episodic_buffer_capacity: 4,
            inhibition_half_life_s: crate::types::constants::DEFAULT_INHIBITION_HALF_LIFE_S,
            saliency_weights: SaliencyWeights::default(),
            surprise_threshold: crate::types::constants::DEFAULT_SURPRISE_THRESHOLD,
            pipeline_event_limit: 100,
            retrieval_combined_semantic_weight: 0.7,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults for
    /// any field the file omits.
    ///
    /// # Errors
    /// Returns an error if the file can't be read or doesn't parse as TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
