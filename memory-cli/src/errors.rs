//! Error-context helpers for user-facing CLI failures.

use anyhow::Result;

/// Adds a short, actionable suggestion below an error's `Display` output.
pub trait EnhancedError<T> {
    fn context_with_help(self, msg: &str, help: &[&str]) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> EnhancedError<T> for Result<T, E> {
    fn context_with_help(self, msg: &str, help: &[&str]) -> Result<T> {
        self.map_err(|e| {
            let mut text = format!("{msg}\n\n{e}");
            if !help.is_empty() {
                text.push_str("\n\npossible next steps:");
                for (i, h) in help.iter().enumerate() {
                    text.push_str(&format!("\n  {}. {h}", i + 1));
                }
            }
            anyhow::anyhow!(text)
        })
    }
}

pub mod helpers {
    #[allow(dead_code)]
    pub const STORE_OPEN_HELP: &[&str] = &[
        "check that --db-path points at a writable file",
        "the directory must already exist",
    ];

    pub const GOAL_NOT_FOUND_HELP: &[&str] =
        &["check the goal id with 'memory-cli goal list'", "the goal may be in a different project"];

    pub const TASK_NOT_FOUND_HELP: &[&str] =
        &["check the task id with 'memory-cli task list'"];
}
