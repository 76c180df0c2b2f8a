//! External LLM provider calls.
//!
//! OpenAI and Groq share the chat-completions format; Anthropic uses the
//! Messages API. Every call is bounded by a timeout and transient failures
//! are retried with exponential backoff.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use rapport_core::{Error, ModelLimits, Result};
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, warn};

use crate::types::{ChatMessage, LLMProvider, ResolvedProvider};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anything that can turn instructions plus user text into raw reply text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one system/user exchange and return the reply's text content.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Human-readable backend name for logs.
    fn describe(&self) -> String;
}

/// Timeout and retry settings for one backend.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    /// Doubles after each failed attempt.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(rapport_core::config::DEFAULT_LLM_TIMEOUT_SECS),
            max_retries: rapport_core::config::DEFAULT_LLM_MAX_RETRIES,
            initial_backoff: Duration::from_millis(250),
        }
    }
}

impl From<&ModelLimits> for RetryPolicy {
    fn from(limits: &ModelLimits) -> Self {
        Self {
            timeout: Duration::from_secs(limits.timeout_secs),
            max_retries: limits.max_retries,
            ..Default::default()
        }
    }
}

/// Run `op` under `policy`: each attempt is bounded by the timeout and only
/// transient errors are retried.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = policy.initial_backoff;
    let mut last_error = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            warn!(
                "LLM request failed, retrying in {:?} (attempt {}/{})",
                backoff, attempt, policy.max_retries
            );
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }

        let outcome = match tokio::time::timeout(policy.timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(policy.timeout.as_secs())),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => last_error = Some(e),
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| Error::Unavailable("max retries exceeded".into())))
}

/// Non-streaming HTTP backend for the hosted providers.
pub struct HttpBackend {
    client: Client,
    provider: ResolvedProvider,
    policy: RetryPolicy,
    temperature: f64,
    max_tokens: usize,
}

impl HttpBackend {
    pub fn new(provider: ResolvedProvider, policy: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(policy.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            provider,
            policy,
            temperature: 0.0,
            max_tokens: 1024,
        })
    }

    fn endpoint(&self) -> String {
        match self.provider.provider {
            LLMProvider::OpenAI => self
                .provider
                .base_url
                .as_deref()
                .map(|base| format!("{}/chat/completions", base.trim_end_matches('/')))
                .unwrap_or_else(|| OPENAI_URL.to_string()),
            LLMProvider::Groq => GROQ_URL.to_string(),
            LLMProvider::Anthropic => ANTHROPIC_URL.to_string(),
        }
    }

    fn request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.policy.timeout.as_secs())
        } else {
            Error::Unavailable(format!("Request failed: {}", e))
        }
    }

    async fn execute(&self, system: &str, user: &str) -> Result<String> {
        match self.provider.provider {
            LLMProvider::OpenAI | LLMProvider::Groq => self.complete_openai_compat(system, user).await,
            LLMProvider::Anthropic => self.complete_anthropic(system, user).await,
        }
    }

    /// OpenAI-compatible chat completion (OpenAI, Groq) in JSON mode.
    async fn complete_openai_compat(&self, system: &str, user: &str) -> Result<String> {
        let url = self.endpoint();
        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        let body = json!({
            "model": self.provider.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "response_format": {"type": "json_object"},
        });

        debug!("Requesting completion from {} with model {}", url, self.provider.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.provider.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let parsed = read_json(response).await?;
        parsed["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Provider("completion response has no message content".into()))
    }

    /// Anthropic Messages API completion.
    async fn complete_anthropic(&self, system: &str, user: &str) -> Result<String> {
        let body = json!({
            "model": self.provider.model,
            "system": system,
            "messages": [ChatMessage::user(user)],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        debug!("Requesting completion from Anthropic with model {}", self.provider.model);

        let response = self
            .client
            .post(ANTHROPIC_URL)
            .header("x-api-key", &self.provider.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let parsed = read_json(response).await?;
        let text: String = parsed["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|b| b["type"] == "text")
                    .filter_map(|b| b["text"].as_str())
                    .collect()
            })
            .unwrap_or_default();
        if text.is_empty() {
            return Err(Error::Provider("Anthropic response has no text content".into()));
        }
        Ok(text)
    }
}

#[async_trait]
impl CompletionBackend for HttpBackend {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        with_retry(&self.policy, || self.execute(system, user)).await
    }

    fn describe(&self) -> String {
        format!("{}:{}", self.provider.provider, self.provider.model)
    }
}

/// Map the HTTP status to an error kind, then decode the JSON body.
async fn read_json(response: reqwest::Response) -> Result<serde_json::Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }
    response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| Error::Provider(format!("Invalid response body: {}", e)))
}

/// 429 and 5xx are worth retrying; other 4xx mean the request was rejected.
fn status_error(status: StatusCode, body: &str) -> Error {
    let message = format!("API error {}: {}", status, body);
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Error::Unavailable(message)
    } else {
        Error::Provider(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(5),
            max_retries,
            initial_backoff: Duration::from_millis(10),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&policy(2), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(Error::Unavailable("503".into()))
            } else {
                Ok("done")
            }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_request_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry(&policy(3), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Provider("401".into()))
        })
        .await;
        assert!(matches!(result, Err(Error::Provider(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_times_out() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry(&policy(1), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(Error::Timeout(5))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_status_mapping() {
        assert!(status_error(StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(status_error(StatusCode::BAD_GATEWAY, "").is_transient());
        assert!(!status_error(StatusCode::UNAUTHORIZED, "").is_transient());
        assert!(!status_error(StatusCode::BAD_REQUEST, "").is_transient());
    }

    #[test]
    fn test_openai_base_url_override() {
        let backend = HttpBackend::new(
            ResolvedProvider {
                provider: LLMProvider::OpenAI,
                model: "local".into(),
                api_key: "k".into(),
                base_url: Some("http://localhost:11434/v1/".into()),
            },
            RetryPolicy::default(),
        )
        .unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:11434/v1/chat/completions");
        assert_eq!(backend.describe(), "openai:local");
    }
}
