//! Deterministic mock [`LlmClient`], for tests and for configuring the
//! system without a live LLM provider (mirrors [`crate::embeddings::mock::MockEmbedder`]'s
//! role for the embedder trait).

use super::LlmClient;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Replays a fixed queue of canned replies, one per [`LlmClient::complete`]
/// call; the last reply repeats once the queue is exhausted. Deterministic
/// and synchronous — never use outside tests.
#[derive(Debug)]
pub struct MockLlmClient {
    replies: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockLlmClient {
    /// Always replies with `reply`.
    #[must_use]
    pub fn constant(reply: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(vec![reply.into()]),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replies with each of `replies` in order, then repeats the last one.
    #[must_use]
    pub fn sequence(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt this client has been asked to complete, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, super::LlmError> {
        self.calls.lock().push(prompt.to_string());
        let mut replies = self.replies.lock();
        if replies.len() > 1 {
            Ok(replies.remove(0))
        } else {
            Ok(replies.first().cloned().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn constant_reply_repeats() {
        let client = MockLlmClient::constant("NO");
        assert_eq!(client.complete("a").await.unwrap(), "NO");
        assert_eq!(client.complete("b").await.unwrap(), "NO");
        assert_eq!(client.calls(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn sequence_is_consumed_then_repeats_last() {
        let client = MockLlmClient::sequence(vec!["0.9".to_string(), "0.1".to_string()]);
        assert_eq!(client.complete("a").await.unwrap(), "0.9");
        assert_eq!(client.complete("b").await.unwrap(), "0.1");
        assert_eq!(client.complete("c").await.unwrap(), "0.1");
    }
}
