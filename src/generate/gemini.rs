//! Google AI: Imagen for backgrounds, Gemini for copy, storylines and
//! recording analysis.
//!
//! Recordings are sent inline as base64 parts, which keeps the request
//! self-contained.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Value, json};

use super::{GenerationAdapter, ImageOutput, ImageRequest, StorylineRequest, TextRequest, send_json};
use crate::assets::to_data_uri;
use crate::error::HeroError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const TEXT_MODEL: &str = "gemini-2.5-flash";
const IMAGE_MODEL: &str = "imagen-4.0-generate-001";
const STORYLINE_MAX_TOKENS: u32 = 8192;

pub struct GeminiAdapter {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiAdapter {
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

    async fn call(&self, model: &str, method: &str, body: &Value) -> Result<Value, HeroError> {
        let request = self
            .client
            .post(format!("{}/models/{}:{}", self.base_url, model, method))
            .query(&[("key", self.api_key.as_str())])
            .json(body);
        send_json("Google AI", request).await
    }
}

/// Join the text parts of the first candidate.
fn candidate_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    Some(text.trim().to_string()).filter(|t| !t.is_empty())
}

fn content_body(parts: Vec<Value>, max_tokens: u32, json_output: bool) -> Value {
    let mut config = json!({ "maxOutputTokens": max_tokens });
    if json_output {
        config["responseMimeType"] = json!("application/json");
    }
    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": config,
    })
}

#[async_trait]
impl GenerationAdapter for GeminiAdapter {
    fn name(&self) -> &'static str {
        "google"
    }

    fn supports_video(&self) -> bool {
        true
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageOutput, HeroError> {
        let body = json!({
            "instances": [{ "prompt": request.prompt }],
            "parameters": { "sampleCount": 1, "aspectRatio": request.aspect.as_str() },
        });
        let response = self
            .call(IMAGE_MODEL, "predict", &body)
            .await
            .map_err(|e| match e {
                HeroError::Provider(msg) if msg.contains("billed users") || msg.contains("billing") => {
                    HeroError::Provider("Google Imagen requires billing.".to_string())
                }
                other => other,
            })?;

        let prediction = response.get("predictions").and_then(|p| p.get(0));
        let encoded = prediction
            .and_then(|p| p.get("bytesBase64Encoded"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                HeroError::Provider(
                    "Google AI did not return an image. The model may require billing or a different region."
                        .to_string(),
                )
            })?;
        let mime = prediction
            .and_then(|p| p.get("mimeType"))
            .and_then(Value::as_str)
            .unwrap_or("image/png");

        // validate before handing the payload on
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| HeroError::Provider(format!("Google AI returned invalid image data: {}", e)))?;

        Ok(ImageOutput {
            url: to_data_uri(mime, &bytes),
            engine: self.name().to_string(),
            fallback: None,
        })
    }

    async fn generate_text(&self, request: &TextRequest) -> Result<String, HeroError> {
        let prompt = format!("{}\n\n{}", request.system, request.prompt);
        let body = content_body(vec![json!({ "text": prompt })], request.max_tokens, false);
        let response = self.call(TEXT_MODEL, "generateContent", &body).await?;
        candidate_text(&response).ok_or_else(|| HeroError::Provider("No text in Google AI response".to_string()))
    }

    async fn generate_storyline(&self, request: &StorylineRequest) -> Result<String, HeroError> {
        let mut parts = Vec::new();
        if let Some(video) = &request.video {
            tracing::debug!(mime = %video.mime, bytes = video.bytes.len(), "sending recording to Gemini");
            parts.push(json!({
                "inline_data": { "mime_type": video.mime, "data": STANDARD.encode(&video.bytes) }
            }));
        }
        parts.push(json!({ "text": format!("{}\n\n{}", request.system, request.prompt) }));

        let body = content_body(parts, STORYLINE_MAX_TOKENS, true);
        let response = self.call(TEXT_MODEL, "generateContent", &body).await?;
        Ok(candidate_text(&response).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_text() {
        let response = json!({"candidates": [{"content": {"parts": [{"text": "Title: A"}, {"text": "\nDescription: B"}]}}]});
        assert_eq!(candidate_text(&response).as_deref(), Some("Title: A\nDescription: B"));
        assert_eq!(candidate_text(&json!({"candidates": []})), None);
    }

    #[test]
    fn test_content_body_json_mode() {
        let body = content_body(vec![json!({"text": "x"})], 10, true);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 10);
        let plain = content_body(vec![], 10, false);
        assert!(plain["generationConfig"].get("responseMimeType").is_none());
    }
}
