//! Feature-hashing embedder — the offline default for semantic similarity.

use std::hash::Hasher;

use async_trait::async_trait;
use siphasher::sip::SipHasher13;

use crate::nlp::{Embedder, NlpError};

/// Fixed keys so vectors are stable across runs and Rust versions. Features
/// are fed to the hasher as raw UTF-8 bytes, never through `Hash`.
/// Changing them changes every embedding.
const HASH_SEED_K0: u64 = 0x6a6f_625f_6d61_7463;
const HASH_SEED_K1: u64 = 0x6865_725f_7631_0000;

const BIGRAM_WEIGHT: f32 = 0.5;

/// Signed feature-hashing embedder over word unigrams and bigrams.
///
/// Needs no model download and is fully deterministic, so it serves as the
/// default backend and as a realistic stand-in in tests. It captures lexical
/// overlap only, not paraphrase.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(&self, feature: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        hasher.write(feature.as_bytes());
        hasher.finish()
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let h = self.hash(feature);
        let idx = (h % self.dimension as u64) as usize;
        // Top bit picks the sign so collisions tend to cancel instead of pile up.
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        vector[idx] += sign * weight;
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
            .map(|t| t.trim_matches('.'))
            .filter(|t| !t.is_empty())
            .collect();

        let mut vector = vec![0.0f32; self.dimension];
        for token in &tokens {
            self.add_feature(&mut vector, token, 1.0);
        }
        for pair in tokens.windows(2) {
            self.add_feature(&mut vector, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, NlpError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_has_configured_dimension() {
        let embedder = HashEmbedder::new(64);
        assert_eq!(embedder.embed_one("rust developer").len(), 64);
    }

    #[test]
    fn test_feature_hash_is_pinned() {
        // SipHash-1-3 of the raw bytes "rust" under the fixed keys.
        let embedder = HashEmbedder::new(384);
        assert_eq!(embedder.hash("rust"), 0xfffb_b6e5_2f8e_5b94);

        // Single feature: bucket 148, negative sign, unit length.
        let v = embedder.embed_one("rust");
        assert_eq!(v[148], -1.0);
        assert_eq!(v.iter().filter(|x| **x != 0.0).count(), 1);
    }

    #[test]
    fn test_zero_dimension_is_raised_to_one() {
        let embedder = HashEmbedder::new(0);
        assert_eq!(embedder.embed_one("rust").len(), 1);
    }

    #[test]
    fn test_embedding_is_unit_length() {
        let embedder = HashEmbedder::new(128);
        let v = embedder.embed_one("Senior Python engineer with AWS and Docker");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new(16);
        assert!(embedder.embed_one("  ,, ").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_embedding_is_case_insensitive() {
        let embedder = HashEmbedder::new(128);
        assert_eq!(embedder.embed_one("Rust Tokio"), embedder.embed_one("rust tokio"));
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_determinism() {
        let embedder = HashEmbedder::new(128);
        let texts = vec!["kubernetes".to_string(), "react".to_string()];
        let first = embedder.embed(&texts).await.unwrap();
        let second = embedder.embed(&texts).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0], embedder.embed_one("kubernetes"));
        assert_eq!(first[1], embedder.embed_one("react"));
    }
}
