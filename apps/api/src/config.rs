use anyhow::{bail, Context, Result};

/// Which embedding model backs the semantic similarity scorer.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingBackend {
    /// Local deterministic feature-hashing embedder.
    Hash { dimension: usize },
    /// all-MiniLM-L6-v2 run in-process (`bert` feature).
    Bert,
    /// OpenAI-compatible `/v1/embeddings` endpoint.
    Remote {
        api_url: String,
        api_key: Option<String>,
        model: String,
    },
}

/// Which entity/phrase recognizer feeds the skill extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizerBackend {
    Pattern,
    /// NER + part-of-speech models run in-process (`bert` feature).
    Bert,
    Llm { api_key: String },
}

/// Application configuration loaded from environment variables.
/// Startup fails if a selected backend is missing its required variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub service_name: String,
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
    pub embedding: EmbeddingBackend,
    pub recognizer: RecognizerBackend,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 5001)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "job-matcher".to_string()),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 60)?,
            max_body_bytes: parse_env("MAX_BODY_BYTES", 5 * 1024 * 1024)?,
            embedding: embedding_from_env()?,
            recognizer: recognizer_from_env()?,
        })
    }
}

fn embedding_from_env() -> Result<EmbeddingBackend> {
    let backend = std::env::var("EMBEDDING_BACKEND").unwrap_or_else(|_| "hash".to_string());
    match backend.as_str() {
        "hash" => Ok(EmbeddingBackend::Hash {
            dimension: parse_env("EMBEDDING_DIMENSION", 384)?,
        }),
        "bert" => Ok(EmbeddingBackend::Bert),
        "remote" => Ok(EmbeddingBackend::Remote {
            api_url: require_env("EMBEDDING_API_URL")?,
            api_key: std::env::var("EMBEDDING_API_KEY").ok(),
            model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "all-MiniLM-L6-v2".to_string()),
        }),
        other => bail!("EMBEDDING_BACKEND must be 'hash', 'bert' or 'remote', got '{other}'"),
    }
}

fn recognizer_from_env() -> Result<RecognizerBackend> {
    let backend = std::env::var("RECOGNIZER_BACKEND").unwrap_or_else(|_| "pattern".to_string());
    match backend.as_str() {
        "pattern" => Ok(RecognizerBackend::Pattern),
        "bert" => Ok(RecognizerBackend::Bert),
        "llm" => Ok(RecognizerBackend::Llm {
            api_key: require_env("ANTHROPIC_API_KEY")?,
        }),
        other => bail!("RECOGNIZER_BACKEND must be 'pattern', 'bert' or 'llm', got '{other}'"),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
