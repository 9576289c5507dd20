mod config;
mod errors;
mod matching;
mod nlp;
mod routes;
mod state;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, EmbeddingBackend, RecognizerBackend};
use crate::matching::orchestrator::MatchOrchestrator;
use crate::nlp::{
    Embedder, HashEmbedder, LlmRecognizer, PatternRecognizer, PhraseRecognizer, RemoteEmbedder,
};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on an unknown backend or missing backend vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting {} v{}", config.service_name, env!("CARGO_PKG_VERSION"));

    let embedder = build_embedder(&config.embedding)?;
    let recognizer = build_recognizer(&config.recognizer)?;

    // Lexicon and experience patterns compile here, once
    let matcher = MatchOrchestrator::new(recognizer, embedder)?;
    let (recognizer_name, embedder_name) = matcher.backends();
    info!("Matcher initialized (recognizer: {recognizer_name}, embedder: {embedder_name})");

    let state = AppState {
        matcher: Arc::new(matcher),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_embedder(backend: &EmbeddingBackend) -> Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match backend {
        EmbeddingBackend::Hash { dimension } => Arc::new(HashEmbedder::new(*dimension)),
        #[cfg(feature = "bert")]
        EmbeddingBackend::Bert => Arc::new(crate::nlp::BertEmbedder::new()?),
        #[cfg(not(feature = "bert"))]
        EmbeddingBackend::Bert => {
            anyhow::bail!("EMBEDDING_BACKEND=bert needs a build with `--features bert`")
        }
        EmbeddingBackend::Remote {
            api_url,
            api_key,
            model,
        } => Arc::new(RemoteEmbedder::new(api_url, api_key.clone(), model.clone())?),
    };
    Ok(embedder)
}

fn build_recognizer(backend: &RecognizerBackend) -> Result<Arc<dyn PhraseRecognizer>> {
    let recognizer: Arc<dyn PhraseRecognizer> = match backend {
        RecognizerBackend::Pattern => Arc::new(PatternRecognizer),
        #[cfg(feature = "bert")]
        RecognizerBackend::Bert => Arc::new(crate::nlp::BertRecognizer::new()?),
        #[cfg(not(feature = "bert"))]
        RecognizerBackend::Bert => {
            anyhow::bail!("RECOGNIZER_BACKEND=bert needs a build with `--features bert`")
        }
        RecognizerBackend::Llm { api_key } => Arc::new(LlmRecognizer::new(api_key.clone())?),
    };
    Ok(recognizer)
}
