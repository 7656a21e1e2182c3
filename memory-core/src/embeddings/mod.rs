//! Embedding interface (C1) and vector utilities (C2).
//!
//! The core never implements an embedding model itself — it consumes one
//! through the [`Embedder`] trait. Embedding model implementations are an
//! external collaborator (spec §1), injected at startup.

pub mod mock;
pub mod similarity;

#[cfg(feature = "http-embedder")]
pub mod http;

pub use similarity::{
    cosine_similarity, cosine_to_unit, deserialize_embedding, jaccard_similarity,
    serialize_embedding,
};

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Default timeout budget for embedder calls (spec §5).
pub const EMBEDDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Maps text to a fixed-dimension embedding vector.
///
/// Implementations are not required to return unit-normalized vectors;
/// consumers always compare via cosine similarity, which is scale-invariant.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single piece of text.
    ///
    /// # Errors
    /// Returns [`Error::EmbeddingUnavailable`] if the provider is
    /// unreachable or the call exceeds [`EMBEDDER_TIMEOUT`].
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts. The default implementation calls [`Embedder::embed`]
    /// sequentially; providers with a native batch endpoint should override
    /// this for efficiency.
    ///
    /// # Errors
    /// Returns [`Error::EmbeddingUnavailable`] on the first failing call.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for t in texts {
            out.push(self.embed(t).await?);
        }
        Ok(out)
    }

    /// The fixed dimension every vector this embedder produces will have.
    fn dimension(&self) -> usize;
}

/// Run an embedder call with the default timeout budget, mapping a timeout
/// or provider error into [`Error::EmbeddingUnavailable`] rather than
/// propagating it — callers fall back to keyword paths instead of failing.
pub async fn embed_with_fallback(
    embedder: &dyn Embedder,
    text: &str,
) -> std::result::Result<Vec<f32>, Error> {
    match tokio::time::timeout(EMBEDDER_TIMEOUT, embedder.embed(text)).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(Error::EmbeddingUnavailable(e.to_string())),
        Err(_) => Err(Error::EmbeddingUnavailable("embedder call timed out".into())),
    }
}

/// [`embed_with_fallback`], consulting `cache` first and populating it on a
/// miss (§5: per-project embedding LRU).
pub async fn embed_with_fallback_cached(
    embedder: &dyn Embedder,
    text: &str,
    cache: &crate::retrieval::EmbeddingCache,
) -> std::result::Result<Vec<f32>, Error> {
    if let Some(hit) = cache.get(text) {
        return Ok(hit);
    }
    let embedding = embed_with_fallback(embedder, text).await?;
    cache.put(text, embedding.clone());
    Ok(embedding)
}
