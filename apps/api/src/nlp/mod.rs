//! NLP collaborators — the embedding model and the entity/phrase recognizer.
//!
//! The matcher treats both as opaque services behind traits. Concrete backends
//! are chosen once at startup from `Config` and shared as `Arc<dyn …>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "bert")]
pub mod bert;
pub mod hash_embedder;
pub mod http;
pub mod llm_recognizer;
pub mod pattern_recognizer;
pub mod prompts;
pub mod remote_embedder;

#[cfg(feature = "bert")]
pub use bert::{BertEmbedder, BertRecognizer};
pub use hash_embedder::HashEmbedder;
pub use llm_recognizer::LlmRecognizer;
pub use pattern_recognizer::PatternRecognizer;
pub use remote_embedder::RemoteEmbedder;

#[derive(Debug, Error)]
pub enum NlpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Model returned {got} embeddings for {expected} inputs")]
    EmbeddingCount { expected: usize, got: usize },

    #[error("Model returned empty content")]
    EmptyContent,

    #[error("Local model error: {0}")]
    Model(String),
}

/// Maps a batch of texts to fixed-length vectors. Same order as the input.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, NlpError>;
}

/// Finds named entities and short noun-like phrases in original-case text.
#[async_trait]
pub trait PhraseRecognizer: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, text: &str) -> Result<Analysis, NlpError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    Organization,
    Product,
    Location,
    Person,
    #[serde(other)]
    Other,
}

impl EntityLabel {
    /// Labels whose entity text may name a skill (ORG / PRODUCT / GPE).
    pub fn is_skill_bearing(self) -> bool {
        matches!(
            self,
            EntityLabel::Organization | EntityLabel::Product | EntityLabel::Location
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub phrases: Vec<String>,
}
