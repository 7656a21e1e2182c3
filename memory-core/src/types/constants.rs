//! Fixed keyword/regex vocabularies used by the consolidation router's
//! heuristic fallback and feature extraction. Compiled once and shared
//! immutably across workers, per the design note on regex-heavy classifiers.

use regex::Regex;
use std::sync::LazyLock;

/// Future markers (prospective memory indicators).
pub const FUTURE_MARKERS: &[&str] = &[
    "will",
    "todo",
    "task",
    "reminder",
    "scheduled",
    "plan",
    "need to",
    "should",
    "must",
    "going to",
    "next",
    "later",
    "upcoming",
    "deadline",
    "due",
];

/// Action verbs (procedural memory indicators).
pub const ACTION_VERBS: &[&str] = &[
    "implement",
    "fix",
    "create",
    "update",
    "delete",
    "test",
    "deploy",
    "configure",
    "setup",
    "build",
    "run",
    "execute",
    "install",
    "compile",
    "debug",
    "refactor",
    "optimize",
    "how to",
    "step",
    "procedure",
    "workflow",
    "process",
];

/// Question words (procedural/semantic indicators).
pub const QUESTION_WORDS: &[&str] = &["how", "what", "why", "when", "where", "which", "who"];

/// Word-boundary temporal markers (episodic memory indicators). Time/date
/// patterns (`\d{1,2}:\d{2}`, `\d{4}-\d{2}-\d{2}`) are matched separately.
const TEMPORAL_WORD_MARKERS: &[&str] = &[
    "when", "at", "on", "yesterday", "today", "tomorrow", "last week", "occurred", "happened",
    "during", "while", "before", "after", "since", "until",
];

/// File-reference patterns (spatial/procedural indicators).
const FILE_REFERENCE_EXTENSIONS: &[&str] =
    &["py", "js", "ts", "java", "cpp", "rs", "go", "rb", "c", "h"];

fn word_boundary_alternation(words: &[&str]) -> String {
    let escaped: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    format!(r"(?i)\b({})\b", escaped.join("|"))
}

pub static TEMPORAL_MARKERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&word_boundary_alternation(TEMPORAL_WORD_MARKERS)).unwrap());

pub static TIME_PATTERN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{1,2}:\d{2}").unwrap());

pub static DATE_PATTERN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

pub static FILE_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let exts = FILE_REFERENCE_EXTENSIONS.join("|");
    Regex::new(&format!(r"(?i)\.(?:{exts})\b|[/\\]")).unwrap()
});

/// Whether `content` contains any temporal marker (word, time, or date).
#[must_use]
pub fn has_temporal_markers(content: &str) -> bool {
    TEMPORAL_MARKERS_RE.is_match(content)
        || TIME_PATTERN_RE.is_match(content)
        || DATE_PATTERN_RE.is_match(content)
}

/// Whether `content` contains any action verb (substring match, as in the
/// original classifier).
#[must_use]
pub fn has_action_verbs(content: &str) -> bool {
    let lower = content.to_lowercase();
    ACTION_VERBS.iter().any(|v| lower.contains(v))
}

/// Whether `content` contains any future marker (substring match).
#[must_use]
pub fn has_future_markers(content: &str) -> bool {
    let lower = content.to_lowercase();
    FUTURE_MARKERS.iter().any(|m| lower.contains(m))
}

/// Whether `content` opens with a question word or contains a `?`.
#[must_use]
pub fn has_question_words(content: &str) -> bool {
    let lower = content.to_lowercase();
    lower.contains('?') || QUESTION_WORDS.iter().any(|q| lower.starts_with(q))
}

/// Whether `content` contains a file path reference.
#[must_use]
pub fn has_file_references(content: &str) -> bool {
    FILE_REFERENCE_RE.is_match(content)
}

/// Half-life, in seconds, used by [`crate::inhibition`] when not overridden
/// by configuration.
pub const DEFAULT_INHIBITION_HALF_LIFE_S: i64 = 1800;

/// Default working-memory decay rate, per second.
pub const DEFAULT_WM_DECAY_RATE: f32 = 0.1;

/// Default surprise-boundary threshold.
pub const DEFAULT_SURPRISE_THRESHOLD: f32 = 0.5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_temporal_markers() {
        assert!(has_temporal_markers("it happened yesterday afternoon"));
        assert!(has_temporal_markers("meeting at 14:30"));
        assert!(has_temporal_markers("on 2026-07-28 we shipped"));
        assert!(!has_temporal_markers("lists are zero indexed"));
    }

    #[test]
    fn detects_action_verbs() {
        assert!(has_action_verbs("please deploy the release"));
        assert!(!has_action_verbs("tomorrow I will rest"));
    }

    #[test]
    fn detects_future_markers() {
        assert!(has_future_markers("tomorrow I will deploy the release"));
    }

    #[test]
    fn detects_question_words() {
        assert!(has_question_words("how does this work?"));
        assert!(has_question_words("what is zero-indexing"));
        assert!(!has_question_words("lists are zero-indexed"));
    }

    #[test]
    fn detects_file_references() {
        assert!(has_file_references("see src/main.rs for details"));
        assert!(!has_file_references("nothing path-like here"));
    }
}
