//! Default HTTP embedding provider.
//!
//! Spec §6: "Default provider is an HTTP endpoint returning
//! `{"embedding": [...]}` on `POST /embedding`; health check on `GET /health`.
//! If unreachable at startup: fail-fast unless a mock embedder is explicitly
//! configured."

use super::{Embedder, EMBEDDER_TIMEOUT};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Embedder backed by a remote HTTP service.
pub struct HttpEmbedder {
    base_url: String,
    dimension: usize,
    client: reqwest::Client,
}

impl HttpEmbedder {
    /// Construct a provider against `base_url`, failing fast if the
    /// service's `/health` endpoint doesn't respond.
    ///
    /// # Errors
    /// Returns [`Error::EmbeddingUnavailable`] if the health check fails.
    pub async fn connect(base_url: impl Into<String>, dimension: usize) -> Result<Self> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(EMBEDDER_TIMEOUT)
            .build()
            .map_err(|e| Error::EmbeddingUnavailable(e.to_string()))?;

        let health_url = format!("{base_url}/health");
        client
            .get(&health_url)
            .send()
            .await
            .map_err(|e| Error::EmbeddingUnavailable(format!("health check failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::EmbeddingUnavailable(format!("health check failed: {e}")))?;

        Ok(Self {
            base_url,
            dimension,
            client,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embedding", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&EmbedRequest { text })
            .send()
            .await
            .map_err(|e| Error::EmbeddingUnavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::EmbeddingUnavailable(e.to_string()))?
            .json::<EmbedResponse>()
            .await
            .map_err(|e| Error::EmbeddingUnavailable(e.to_string()))?;

        if resp.embedding.len() != self.dimension {
            return Err(Error::SchemaMismatch(format!(
                "embedder returned {} dims, expected {}",
                resp.embedding.len(),
                self.dimension
            )));
        }
        Ok(resp.embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
