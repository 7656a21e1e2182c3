//! Vector similarity and serialization utilities (C2).

/// Cosine similarity between two vectors, in `[-1, 1]`.
///
/// Returns `0.0` for a zero-length vector or a dimension mismatch rather
/// than panicking — callers treat that as "no signal", not an error.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Map a `[-1, 1]` cosine similarity into a `[0, 1]` score.
#[must_use]
pub fn cosine_to_unit(cos_sim: f32) -> f32 {
    ((cos_sim + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Serialize an embedding as a length-prefixed IEEE-754 f32 byte array, the
/// on-disk representation every store kernel uses (§4.1).
#[must_use]
pub fn serialize_embedding(v: &[f32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + v.len() * 4);
    buf.extend_from_slice(&(v.len() as u32).to_le_bytes());
    for x in v {
        buf.extend_from_slice(&x.to_le_bytes());
    }
    buf
}

/// Inverse of [`serialize_embedding`]. Returns `None` on a truncated or
/// malformed buffer.
#[must_use]
pub fn deserialize_embedding(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() < 4 {
        return None;
    }
    let len = u32::from_le_bytes(bytes[0..4].try_into().ok()?) as usize;
    let expected = 4 + len * 4;
    if bytes.len() != expected {
        return None;
    }
    let mut out = Vec::with_capacity(len);
    for chunk in bytes[4..].chunks_exact(4) {
        out.push(f32::from_le_bytes(chunk.try_into().ok()?));
    }
    Some(out)
}

/// Jaccard similarity over whitespace-tokenized, lowercased content. Used
/// as the fallback when an embedding can't be produced (§4.13).
#[must_use]
pub fn jaccard_similarity(a: &str, b: &str) -> f32 {
    use std::collections::HashSet;
    let ta: HashSet<&str> = a.split_whitespace().collect();
    let tb: HashSet<&str> = b.split_whitespace().collect();
    if ta.is_empty() && tb.is_empty() {
        return 0.0;
    }
    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_are_maximally_similar() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_are_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn mismatched_dims_return_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn embedding_roundtrips() {
        let v = vec![0.1_f32, -0.2, 0.3, 1.0];
        let bytes = serialize_embedding(&v);
        let back = deserialize_embedding(&bytes).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn jaccard_matches_overlap() {
        assert!((jaccard_similarity("fix the auth bug", "fix auth bug today") - 0.6).abs() < 1e-6);
    }
}
