//! Embedding client for an OpenAI-compatible `/v1/embeddings` endpoint
//! (text-embeddings-inference, vLLM, OpenAI itself, ...).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nlp::http::{build_client, send_json, RetryPolicy};
use crate::nlp::{Embedder, NlpError};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

pub struct RemoteEmbedder {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    retry: RetryPolicy,
}

impl RemoteEmbedder {
    pub fn new(api_url: &str, api_key: Option<String>, model: String) -> Result<Self, NlpError> {
        Ok(Self {
            client: build_client(Duration::from_secs(30))?,
            endpoint: format!("{}/v1/embeddings", api_url.trim_end_matches('/')),
            api_key,
            model,
            retry: RetryPolicy::default(),
        })
    }

    #[cfg(test)]
    fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    fn name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, NlpError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response: EmbeddingResponse = send_json("Embedding API", self.retry, || {
            let request = self.client.post(&self.endpoint).json(&body);
            match &self.api_key {
                Some(key) => request.bearer_auth(key),
                None => request,
            }
        })
        .await?;

        debug!(
            "Embedding call succeeded: model={}, inputs={}",
            self.model,
            texts.len()
        );

        into_ordered_vectors(response, texts.len())
    }
}

/// Restores input order (servers may return `data` unordered) and checks that
/// exactly one vector came back per input.
fn into_ordered_vectors(
    mut response: EmbeddingResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, NlpError> {
    if response.data.len() != expected {
        return Err(NlpError::EmbeddingCount {
            expected,
            got: response.data.len(),
        });
    }
    response.data.sort_by_key(|d| d.index);
    Ok(response.data.into_iter().map(|d| d.embedding).collect())
}
