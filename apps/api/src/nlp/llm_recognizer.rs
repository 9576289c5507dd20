//! LLM-backed recognizer — asks Claude to tag entities and noun phrases.
//!
//! Model: claude-sonnet-4-5 (hardcoded so tagging behaviour does not drift
//! between deployments).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nlp::http::{build_client, send_json, RetryPolicy};
use crate::nlp::prompts::{RECOGNIZE_PROMPT_TEMPLATE, RECOGNIZE_SYSTEM};
use crate::nlp::{Analysis, NlpError, PhraseRecognizer};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

pub struct LlmRecognizer {
    client: Client,
    api_key: String,
    endpoint: String,
    retry: RetryPolicy,
}

impl LlmRecognizer {
    pub fn new(api_key: String) -> Result<Self, NlpError> {
        Ok(Self {
            client: build_client(Duration::from_secs(120))?,
            api_key,
            endpoint: ANTHROPIC_API_URL.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: String, retry: RetryPolicy) -> Self {
        self.endpoint = endpoint;
        self.retry = retry;
        self
    }
}

#[async_trait]
impl PhraseRecognizer for LlmRecognizer {
    fn name(&self) -> &str {
        MODEL
    }

    async fn analyze(&self, text: &str) -> Result<Analysis, NlpError> {
        let prompt = RECOGNIZE_PROMPT_TEMPLATE.replace("{text}", text);
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: RECOGNIZE_SYSTEM,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
        };

        let response: MessagesResponse = send_json("Anthropic API", self.retry, || {
            self.client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
        })
        .await?;

        debug!(
            "Recognizer call succeeded: input_tokens={}, output_tokens={}",
            response.usage.input_tokens, response.usage.output_tokens
        );

        parse_analysis(response.text().ok_or(NlpError::EmptyContent)?)
    }
}

fn parse_analysis(text: &str) -> Result<Analysis, NlpError> {
    Ok(serde_json::from_str(strip_json_fences(text))?)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(stripped)
}
