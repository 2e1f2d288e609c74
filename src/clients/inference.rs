//! Client for an OpenAI-compatible chat-completions endpoint.
//!
//! One blocking request per generation: no retries, no streaming. The full
//! generated text comes back in a single response or the call fails.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::InferenceConfig;

#[derive(Debug, Error)]
pub enum InferenceError {
    /// The API key is missing. Raised before any network I/O.
    #[error("Inference API key is not configured (set [inference].api_key or LECTERN_INFERENCE_API_KEY)")]
    MissingApiKey,

    #[error("Inference request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Inference API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Inference API returned no completion choices")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    config: InferenceConfig,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.request_timeout_seconds.into(),
            ))
            .user_agent("Lectern/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build inference HTTP client: {e}"))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends a single chat completion request and returns the generated text.
    ///
    /// Fails fast with [`InferenceError::MissingApiKey`] when no key is
    /// configured, without touching the network.
    pub async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, InferenceError> {
        let api_key = &self.config.api_key;
        if api_key.is_empty() {
            return Err(InferenceError::MissingApiKey);
        }

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api { status, body });
        }

        let response: ChatResponse = response.json().await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(InferenceError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_key() -> InferenceConfig {
        InferenceConfig {
            api_key: String::new(),
            ..InferenceConfig::default()
        }
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_network() {
        // Point at an unroutable URL so an accidental network attempt
        // would surface as a request error instead.
        let config = InferenceConfig {
            api_url: "http://192.0.2.1/v1/chat/completions".to_string(),
            request_timeout_seconds: 1,
            ..config_without_key()
        };

        let client = InferenceClient::new(config).unwrap();
        let err = client.complete("system", "user").await.unwrap_err();
        assert!(matches!(err, InferenceError::MissingApiKey));
    }

    #[test]
    fn request_body_carries_fixed_parameters() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            max_tokens: 2000,
            temperature: 0.7,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["max_tokens"], 2000);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
