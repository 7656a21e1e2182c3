//! 11-feature extraction for the consolidation router (§4.11).

use crate::types::constants::{
    has_action_verbs, has_file_references, has_future_markers, has_question_words,
    has_temporal_markers,
};
use crate::types::{ContentType, WorkingMemoryItem};
use chrono::{DateTime, Utc};

fn bool_to_f32(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Stable feature order, documented so a retrained classifier and the
/// heuristic fallback never disagree on what index means what:
/// 1. content length, 2. is verbal, 3. is spatial, 4. activation level,
/// 5. importance, 6. seconds in WM, 7. has temporal markers,
/// 8. has action verbs, 9. has future markers, 10. has question words,
/// 11. has file references.
#[must_use]
pub fn extract(item: &WorkingMemoryItem, now: DateTime<Utc>) -> [f32; 11] {
    let content = &item.content;
    let seconds_in_wm = (now - item.created_at).num_milliseconds().max(0) as f32 / 1000.0;

    [
        content.len() as f32,
        bool_to_f32(item.content_type == ContentType::Verbal),
        bool_to_f32(item.content_type == ContentType::Spatial),
        item.activation_level,
        item.importance,
        seconds_in_wm,
        bool_to_f32(has_temporal_markers(content)),
        bool_to_f32(has_action_verbs(content)),
        bool_to_f32(has_future_markers(content)),
        bool_to_f32(has_question_words(content)),
        bool_to_f32(has_file_references(content)),
    ]
}
