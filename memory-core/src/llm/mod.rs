//! LLM interface (§6, optional external collaborator).
//!
//! The core never ships a concrete LLM client — surprise scoring and
//! contradiction detection are useful refinements over the embedding-only
//! heuristics in [`crate::surprise`] and [`crate::semantic`], but both
//! already have a fully-specified neutral fallback, so a host process can
//! run the whole crate with `None` wired in. Grounded on the design note's
//! treatment of lazy optional dependencies: the neutral-value fallback
//! lives on the trait's free functions here, not scattered across call
//! sites.

pub mod mock;

use async_trait::async_trait;
use std::time::Duration;

/// Default timeout budget for an LLM completion call (§5).
pub const LLM_TIMEOUT: Duration = Duration::from_secs(30);

/// Neutral surprise score substituted on timeout or a reply that doesn't
/// parse as a number (§5, §6).
pub const NEUTRAL_SURPRISE: f32 = 0.5;

/// A pluggable text-completion backend used for surprise scoring and
/// contradiction detection. Any parse failure on the reply is the caller's
/// responsibility to turn into a neutral result — this trait only makes
/// the raw completion call.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete `prompt`, returning the model's raw reply text.
    ///
    /// # Errors
    /// Returns an error if the provider is unreachable or the call fails.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// An LLM-backed call failed; every call site maps this to a documented
/// neutral fallback rather than propagating it.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM call timed out")]
    Timeout,
    #[error("LLM provider error: {0}")]
    Provider(String),
}

/// Prompt template for numeric surprise scoring: the reply is expected to
/// be a single float in `[0,1]`.
#[must_use]
pub fn surprise_prompt(context: &str, event: &str) -> String {
    format!(
        "On a scale from 0.0 (expected) to 1.0 (completely surprising), how \
         surprising is the following event given this context?\n\nContext: \
         {context}\n\nEvent: {event}\n\nReply with only a number between 0.0 \
         and 1.0."
    )
}

/// Run `client.complete(prompt)` under [`LLM_TIMEOUT`], parsing the reply as
/// a float clamped to `[0,1]`. Any timeout, provider error, or parse
/// failure returns [`NEUTRAL_SURPRISE`] rather than propagating (§5, §6).
pub async fn score_surprise(client: &dyn LlmClient, context: &str, event: &str) -> f32 {
    let prompt = surprise_prompt(context, event);
    match tokio::time::timeout(LLM_TIMEOUT, client.complete(&prompt)).await {
        Ok(Ok(reply)) => reply
            .trim()
            .parse::<f32>()
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(NEUTRAL_SURPRISE),
        _ => NEUTRAL_SURPRISE,
    }
}

/// Prompt template for contradiction detection against a set of candidate
/// existing records, each tagged with its id.
#[must_use]
pub fn contradiction_prompt(new_content: &str, candidates: &[(uuid::Uuid, String)]) -> String {
    let listed: Vec<String> = candidates
        .iter()
        .map(|(id, content)| format!("- {id}: {content}"))
        .collect();
    format!(
        "New statement: {new_content}\n\nExisting records:\n{}\n\n\
         Does the new statement contradict one of the existing records? \
         Reply with \"YES: <id>\" naming the contradicted record's id, or \
         \"NO\" if there is no contradiction.",
        listed.join("\n")
    )
}

/// Parse a contradiction-detection reply of the form `YES: <uuid>` or `NO`.
/// Any other shape (including a `YES:` reply whose id isn't among
/// `candidates`) is treated as `NO` — a parse failure is never surfaced as
/// an error (§6).
#[must_use]
pub fn parse_contradiction_reply(reply: &str, candidates: &[uuid::Uuid]) -> Option<uuid::Uuid> {
    let reply = reply.trim();
    let rest = reply.strip_prefix("YES:").or_else(|| reply.strip_prefix("yes:"))?;
    let id: uuid::Uuid = rest.trim().parse().ok()?;
    candidates.contains(&id).then_some(id)
}

/// Run `client.complete` with [`contradiction_prompt`], returning the id of
/// the contradicted candidate if the model names one among `candidates`.
/// Timeout, provider error, or an unparseable reply all resolve to `None`
/// ("no contradiction found") rather than an error (§5, §6).
pub async fn detect_contradiction(
    client: &dyn LlmClient,
    new_content: &str,
    candidates: &[(uuid::Uuid, String)],
) -> Option<uuid::Uuid> {
    let ids: Vec<uuid::Uuid> = candidates.iter().map(|(id, _)| *id).collect();
    let prompt = contradiction_prompt(new_content, candidates);
    match tokio::time::timeout(LLM_TIMEOUT, client.complete(&prompt)).await {
        Ok(Ok(reply)) => parse_contradiction_reply(&reply, &ids),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yes_with_known_id() {
        let id = uuid::Uuid::new_v4();
        let reply = format!("YES: {id}");
        assert_eq!(parse_contradiction_reply(&reply, &[id]), Some(id));
    }

    #[test]
    fn no_reply_yields_none() {
        assert_eq!(parse_contradiction_reply("NO", &[uuid::Uuid::new_v4()]), None);
    }

    #[test]
    fn unknown_id_is_treated_as_no_contradiction() {
        let known = uuid::Uuid::new_v4();
        let unknown = uuid::Uuid::new_v4();
        let reply = format!("YES: {unknown}");
        assert_eq!(parse_contradiction_reply(&reply, &[known]), None);
    }

    #[test]
    fn garbage_reply_is_not_a_match() {
        assert_eq!(
            parse_contradiction_reply("I think so, maybe?", &[uuid::Uuid::new_v4()]),
            None
        );
    }
}
