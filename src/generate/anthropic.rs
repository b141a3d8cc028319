//! Anthropic Messages API, used for storylines and copy.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{GenerationAdapter, StorylineRequest, TextRequest, send_json};
use crate::error::HeroError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-sonnet-4-20250514";
const STORYLINE_MAX_TOKENS: u32 = 4096;

pub struct AnthropicAdapter {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicAdapter {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn message(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String, HeroError> {
        let body = json!({
            "model": MODEL,
            "max_tokens": max_tokens,
            "system": system,
            "messages": [{ "role": "user", "content": prompt }],
        });
        let request = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body);
        let response = send_json("Anthropic", request).await?;
        Ok(message_text(&response))
    }
}

/// Concatenate the text blocks of a Messages response.
fn message_text(response: &Value) -> String {
    response
        .get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl GenerationAdapter for AnthropicAdapter {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate_text(&self, request: &TextRequest) -> Result<String, HeroError> {
        self.message(&request.system, &request.prompt, request.max_tokens).await
    }

    async fn generate_storyline(&self, request: &StorylineRequest) -> Result<String, HeroError> {
        self.message(&request.system, &request.prompt, STORYLINE_MAX_TOKENS).await
    }
}
