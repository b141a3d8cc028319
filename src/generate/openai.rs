//! OpenAI: DALL-E 3 images and chat completions.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{AspectRatio, GenerationAdapter, ImageOutput, ImageRequest, StorylineRequest, TextRequest, send_json};
use crate::error::HeroError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const IMAGE_MODEL: &str = "dall-e-3";
const CHAT_MODEL: &str = "gpt-4o-mini";
const STORYLINE_MAX_TOKENS: u32 = 4096;

pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiAdapter {
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

    async fn chat(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String, HeroError> {
        let body = json!({
            "model": CHAT_MODEL,
            "max_tokens": max_tokens,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
        });
        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);
        let response = send_json("OpenAI", request).await?;
        Ok(chat_text(&response).unwrap_or_default().trim().to_string())
    }
}

fn chat_text(response: &Value) -> Option<&str> {
    response
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

fn image_size(aspect: AspectRatio) -> &'static str {
    match aspect {
        AspectRatio::Square => "1024x1024",
        AspectRatio::Widescreen => "1792x1024",
    }
}

#[async_trait]
impl GenerationAdapter for OpenAiAdapter {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageOutput, HeroError> {
        let body = json!({
            "model": IMAGE_MODEL,
            "prompt": request.prompt,
            "n": 1,
            "size": image_size(request.aspect),
            "response_format": "url",
            "quality": "hd",
        });
        let http = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);
        let response = send_json("OpenAI", http).await?;
        let url = response
            .get("data")
            .and_then(|d| d.get(0))
            .and_then(|d| d.get("url"))
            .and_then(Value::as_str)
            .ok_or_else(|| HeroError::Provider("OpenAI did not return an image URL".to_string()))?;
        Ok(ImageOutput {
            url: url.to_string(),
            engine: self.name().to_string(),
            fallback: None,
        })
    }

    async fn generate_text(&self, request: &TextRequest) -> Result<String, HeroError> {
        self.chat(&request.system, &request.prompt, request.max_tokens).await
    }

    async fn generate_storyline(&self, request: &StorylineRequest) -> Result<String, HeroError> {
        self.chat(&request.system, &request.prompt, STORYLINE_MAX_TOKENS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_text_extraction() {
        let response = json!({"choices": [{"message": {"content": " hi "}}]});
        assert_eq!(chat_text(&response), Some(" hi "));
        assert_eq!(chat_text(&json!({"choices": []})), None);
    }

    #[test]
    fn test_widescreen_size() {
        assert_eq!(image_size(AspectRatio::Widescreen), "1792x1024");
    }
}
