//! Chat-completion client
//!
//! The [`CompletionClient`] seam plus an implementation for any endpoint that
//! speaks the OpenAI chat completions API in JSON mode.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::AiError;

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
const MODEL_ENV: &str = "OPENAI_MODEL";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Sends one system + user message pair and returns the JSON content of the
/// reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete_json(&self, system: &str, user: &str) -> Result<String, AiError>;
}

/// Connection settings for an OpenAI-compatible endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    /// Without a key every request fails with [`AiError::NotConfigured`]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
        }
    }
}

impl OpenAiConfig {
    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`
    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_empty(API_KEY_ENV),
            base_url: non_empty(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            model: non_empty(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// OpenAI chat completions over HTTPS
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        if config.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; AI features will return errors");
        }

        Ok(Self { client, config })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete_json(&self, system: &str, user: &str) -> Result<String, AiError> {
        let api_key = self.config.api_key.as_deref().ok_or(AiError::NotConfigured)?;

        let request = OpenAiRequest {
            model: &self.config.model,
            messages: vec![
                OpenAiMessage { role: "system", content: system },
                OpenAiMessage { role: "user", content: user },
            ],
            response_format: ResponseFormat { kind: "json_object" },
        };

        tracing::debug!(model = %self.config.model, prompt_chars = user.len(), "Sending completion request");

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Completion API returned an error");
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OpenAiResponse = serde_json::from_str(&body)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}

/// Canned client for tests; records every prompt it receives
#[cfg(test)]
pub(crate) struct StubClient {
    reply: Result<String, u16>,
    pub prompts: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl StubClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_owned()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn last_user_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().map(|(_, user)| user.clone())
    }
}

#[cfg(test)]
#[async_trait]
impl CompletionClient for StubClient {
    async fn complete_json(&self, system: &str, user: &str) -> Result<String, AiError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_owned(), user.to_owned()));
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(status) => Err(AiError::Api {
                status: *status,
                body: "stub failure".to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_when_unset() {
        let config = OpenAiConfig::from_lookup(|_| None);
        assert_eq!(config, OpenAiConfig::default());
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn test_config_ignores_blank_values() {
        let config = OpenAiConfig::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("  ".to_owned()),
            "OPENAI_BASE_URL" => Some("http://localhost:11434/v1/".to_owned()),
            _ => None,
        });
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, "http://localhost:11434/v1/");
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let client = OpenAiClient::new(OpenAiConfig {
            base_url: "http://localhost:8080/v1/".to_owned(),
            ..OpenAiConfig::default()
        })
        .unwrap();
        assert_eq!(client.api_url("chat/completions"), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_request_uses_json_mode() {
        let request = OpenAiRequest {
            model: "gpt-4o",
            messages: vec![OpenAiMessage { role: "user", content: "hi" }],
            response_format: ResponseFormat { kind: "json_object" },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn test_missing_key_is_reported_before_any_request() {
        let client = OpenAiClient::new(OpenAiConfig::default()).unwrap();
        let err = client.complete_json("system", "user").await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured));
    }
}
