//! Deterministic mock [`Embedder`], for tests and for configuring the
//! system without a live embedding provider (spec §6: "If unreachable at
//! startup: fail-fast unless a mock embedder is explicitly configured").

use super::Embedder;
use crate::error::Result;
use async_trait::async_trait;
use std::hash::{Hash, Hasher};

/// Hashes text into a deterministic, unit-normalized vector. Not semantic —
/// never use outside tests and local development.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        text.hash(&mut hasher);
        let mut seed = hasher.finish();

        let mut v = Vec::with_capacity(self.dimension);
        for _ in 0..self.dimension {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            v.push(((seed >> 16) as f32) / 32768.0 - 1.0);
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.generate(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn is_deterministic() {
        let e = MockEmbedder::new(16);
        let a = e.embed("hello world").await.unwrap();
        let b = e.embed("hello world").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn differs_by_text() {
        let e = MockEmbedder::new(16);
        let a = e.embed("hello").await.unwrap();
        let b = e.embed("goodbye").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn matches_configured_dimension() {
        let e = MockEmbedder::new(32);
        let v = e.embed("x").await.unwrap();
        assert_eq!(v.len(), 32);
        assert_eq!(e.dimension(), 32);
    }
}
