//! Semantic similarity — cosine similarity of model embeddings, best effort.

use std::sync::Arc;

use tracing::warn;

use crate::nlp::Embedder;

/// Outcome of a similarity lookup. Model failures become an explicit neutral
/// fallback instead of an error so the analysis can always continue.
#[derive(Debug, Clone, PartialEq)]
pub enum Similarity {
    Computed(f64),
    Fallback { reason: String },
}

impl Similarity {
    /// The similarity value, 0.0 for a fallback.
    pub fn value(&self) -> f64 {
        match self {
            Similarity::Computed(v) => *v,
            Similarity::Fallback { .. } => 0.0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Similarity::Fallback { .. })
    }
}

/// Cosine similarity in [-1, 1]. Returns `None` for mismatched dimensions or
/// zero vectors, where the ratio is undefined.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    Some((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

pub struct SemanticScorer {
    embedder: Arc<dyn Embedder>,
}

impl SemanticScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// Embeds both texts in one batch and compares them.
    pub async fn similarity(&self, text_a: &str, text_b: &str) -> Similarity {
        let batch = [text_a.to_string(), text_b.to_string()];

        let vectors = match self.embedder.embed(&batch).await {
            Ok(v) => v,
            Err(e) => {
                warn!(embedder = self.embedder.name(), "Semantic similarity unavailable: {e}");
                return Similarity::Fallback {
                    reason: e.to_string(),
                };
            }
        };

        let [a, b] = vectors.as_slice() else {
            warn!(
                got = vectors.len(),
                "Embedder returned the wrong number of vectors"
            );
            return Similarity::Fallback {
                reason: format!("expected 2 embeddings, got {}", vectors.len()),
            };
        };

        match cosine_similarity(a, b) {
            Some(v) => Similarity::Computed(v),
            None => Similarity::Fallback {
                reason: "embeddings are empty, zero or of different dimensions".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::testing::{FailingEmbedder, StubEmbedder};
    use crate::nlp::HashEmbedder;

    #[test]
    fn test_cosine_identical_vectors_is_one() {
        let v = [0.3, -0.2, 0.9];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-9, "sim was {sim}");
    }

    #[test]
    fn test_cosine_orthogonal_and_opposite() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), Some(0.0));
        let opposite = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((opposite + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_undefined_cases() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), None);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), None);
        assert_eq!(cosine_similarity(&[], &[]), None);
    }

    #[test]
    fn test_fallback_value_is_zero() {
        let fallback = Similarity::Fallback {
            reason: "down".to_string(),
        };
        assert_eq!(fallback.value(), 0.0);
        assert!(fallback.is_fallback());
        assert_eq!(Similarity::Computed(0.42).value(), 0.42);
    }

    #[tokio::test]
    async fn test_text_with_itself_is_one() {
        let scorer = SemanticScorer::new(Arc::new(HashEmbedder::new(384)));
        let text = "Backend engineer: Rust, PostgreSQL, Kubernetes";
        let sim = scorer.similarity(text, text).await;
        assert!((sim.value() - 1.0).abs() < 1e-6, "sim was {sim:?}");
    }

    #[tokio::test]
    async fn test_related_texts_score_higher_than_unrelated() {
        let scorer = SemanticScorer::new(Arc::new(HashEmbedder::new(1024)));
        let job = "python developer with django and aws";
        let close = scorer.similarity("python django developer on aws", job).await.value();
        let far = scorer.similarity("pastry chef, french desserts", job).await.value();
        assert!(close > far, "close={close}, far={far}");
    }

    #[tokio::test]
    async fn test_stub_vectors_are_compared() {
        let scorer = SemanticScorer::new(Arc::new(StubEmbedder(vec![
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ])));
        let sim = scorer.similarity("a", "b").await;
        assert!((sim.value() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_embedder_error_falls_back_to_zero() {
        let scorer = SemanticScorer::new(Arc::new(FailingEmbedder));
        let sim = scorer.similarity("a", "b").await;
        assert!(sim.is_fallback());
        assert_eq!(sim.value(), 0.0);
    }

    #[tokio::test]
    async fn test_missing_vector_falls_back_to_zero() {
        let scorer = SemanticScorer::new(Arc::new(StubEmbedder(vec![vec![1.0]])));
        assert!(scorer.similarity("a", "b").await.is_fallback());
    }
}
