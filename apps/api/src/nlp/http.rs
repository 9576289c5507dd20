//! Shared HTTP plumbing for the remote model backends.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::nlp::NlpError;

/// Attempts per call and the first backoff delay; later delays double.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay * (1 << (attempt - 1))
    }
}

/// Builds the reqwest client used by every remote backend.
pub fn build_client(timeout: Duration) -> Result<Client, NlpError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Sends the request built by `make_request`, retrying on transport errors,
/// 429 and 5xx with exponential backoff (1s, 2s by default). Other non-2xx
/// statuses fail immediately with the body text as the message.
pub async fn send_json<T, F>(
    service: &str,
    retry: RetryPolicy,
    make_request: F,
) -> Result<T, NlpError>
where
    T: DeserializeOwned,
    F: Fn() -> RequestBuilder,
{
    let mut last_error: Option<NlpError> = None;

    for attempt in 0..retry.max_attempts {
        if attempt > 0 {
            let delay = retry.delay_before(attempt);
            warn!(
                "{service} call attempt {} failed, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match make_request().send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(NlpError::Http(e));
                continue;
            }
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("{service} returned {}: {}", status, body);
            last_error = Some(NlpError::Api {
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        if !status.is_success() {
            return Err(api_error(response).await);
        }

        return Ok(response.json::<T>().await?);
    }

    Err(last_error.unwrap_or(NlpError::RateLimited {
        retries: retry.max_attempts,
    }))
}

async fn api_error(response: Response) -> NlpError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    // Both Anthropic and OpenAI-style APIs nest the message under `error.message`.
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or(body);
    NlpError::Api { status, message }
}
