//! LLM Client — the single point of entry for all completion-service calls.
//!
//! ARCHITECTURAL RULE: task functions never talk HTTP themselves. They receive a
//! `&dyn CompletionService` and everything network-facing lives here.
//!
//! Model: gpt-4 at temperature 0.2 (hardcoded — do not make configurable)

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(test)]
pub mod fake;

/// The model used for every completion call.
pub const MODEL: &str = "gpt-4";
/// Low sampling temperature favouring deterministic output.
pub const TEMPERATURE: f64 = 0.2;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Token accounting reported by the provider, when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// The one response shape every caller sees. `text` is the raw, untrimmed completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<Usage>,
}

/// Anything that turns a filled prompt into completion text.
///
/// Carried in `AppState` as `Arc<dyn CompletionService>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError>;

    fn model(&self) -> &str {
        MODEL
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// HTTP client for an OpenAI-compatible `chat/completions` endpoint.
/// Each call is bounded by `timeout`; 429, 5xx and transport failures are retried
/// up to `max_retries` times with exponential backoff.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        base_url: &Url,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = format!(
            "{}/chat/completions",
            base_url.as_str().trim_end_matches('/')
        );

        Ok(Self {
            client,
            endpoint,
            api_key,
            timeout,
            max_retries,
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Overrides the base retry delay (doubled on each attempt).
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_once(&self, request: &ChatRequest<'_>) -> Result<Completion, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)?;

        Ok(Completion {
            text,
            usage: parsed.usage,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Http(e)
        }
    }
}

/// Exponential backoff: base, 2×base, 4×base, ... capped at 2^16×base, saturating.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32 << attempt.min(16))
}

fn is_retryable(err: &LlmError) -> bool {
    match err {
        LlmError::Api { status, .. } => *status == 429 || *status >= 500,
        LlmError::Http(_) | LlmError::Timeout(_) => true,
        _ => false,
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError> {
        let request = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut attempt = 0;
        loop {
            let started = Instant::now();
            match self.send_once(&request).await {
                Ok(completion) => {
                    debug!(
                        model = MODEL,
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        prompt_tokens = completion.usage.map(|u| u.prompt_tokens),
                        completion_tokens = completion.usage.map(|u| u.completion_tokens),
                        "Completion call succeeded"
                    );
                    return Ok(completion);
                }
                Err(err) if is_retryable(&err) && attempt < self.max_retries => {
                    let delay = backoff_delay(self.backoff, attempt);
                    warn!(
                        "Completion attempt {} failed ({}), retrying after {}ms...",
                        attempt + 1,
                        err,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(LlmError::Api { status: 429, .. }) if self.max_retries > 0 => {
                    return Err(LlmError::RateLimited {
                        retries: self.max_retries,
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }
}
