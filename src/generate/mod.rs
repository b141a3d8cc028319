//! # Generation Providers
//!
//! Image, copy and storyline generation behind one trait.
//!
//! Each provider implements the subset of [`GenerationAdapter`] it supports;
//! the rest return [`HeroError::Provider`]. A [`FallbackChain`] tries its
//! providers in order and returns the first success.
//!
//! | Capability | Order |
//! |------------|-------|
//! | Background images | Gemini (Imagen), OpenAI (DALL-E), placeholder |
//! | Title / description copy | Gemini, OpenAI |
//! | Storylines | Anthropic, Gemini, OpenAI (video: Gemini only) |

pub mod anthropic;
pub mod copy;
pub mod gemini;
pub mod openai;
pub mod placeholder;
pub mod prompts;

pub use copy::{CopyKind, GeneratedCopy, fallback_copy, parse_copy};

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::HeroError;

/// Requested frame shape for a generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "16:9" => AspectRatio::Widescreen,
            _ => AspectRatio::Square,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageRequest {
    /// Full prompt, style preamble included.
    pub prompt: String,
    pub aspect: AspectRatio,
}

/// A generated image reference and the engine that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageOutput {
    pub url: String,
    pub engine: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TextRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
}

/// An uploaded screen recording.
#[derive(Clone)]
pub struct VideoClip {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for VideoClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoClip")
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct StorylineRequest {
    pub system: String,
    pub prompt: String,
    pub video: Option<VideoClip>,
}

/// One generation backend.
#[async_trait]
pub trait GenerationAdapter: Send + Sync {
    /// Engine name reported to the client.
    fn name(&self) -> &'static str;

    /// Whether [`GenerationAdapter::generate_storyline`] accepts video.
    fn supports_video(&self) -> bool {
        false
    }

    async fn generate_image(&self, _request: &ImageRequest) -> Result<ImageOutput, HeroError> {
        Err(HeroError::Provider(format!("{} cannot generate images", self.name())))
    }

    async fn generate_text(&self, _request: &TextRequest) -> Result<String, HeroError> {
        Err(HeroError::Provider(format!("{} cannot generate text", self.name())))
    }

    async fn generate_storyline(&self, _request: &StorylineRequest) -> Result<String, HeroError> {
        Err(HeroError::Provider(format!("{} cannot generate storylines", self.name())))
    }
}

/// Ordered list of providers; the first success wins.
#[derive(Clone, Default)]
pub struct FallbackChain {
    providers: Vec<Arc<dyn GenerationAdapter>>,
    /// Returned when the chain has no usable provider.
    missing_message: String,
}

impl FallbackChain {
    pub fn new(missing_message: impl Into<String>) -> Self {
        Self {
            providers: Vec::new(),
            missing_message: missing_message.into(),
        }
    }

    pub fn with(mut self, provider: Arc<dyn GenerationAdapter>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    fn no_provider(&self) -> HeroError {
        HeroError::NoProvider(self.missing_message.clone())
    }
}

#[async_trait]
impl GenerationAdapter for FallbackChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn supports_video(&self) -> bool {
        self.providers.iter().any(|p| p.supports_video())
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageOutput, HeroError> {
        // The first failure names the fallback; the last one is returned.
        let mut first_failure: Option<(&'static str, String)> = None;
        let mut last_error = None;
        for provider in &self.providers {
            match provider.generate_image(request).await {
                Ok(mut output) => {
                    if let Some((failed, error)) = &first_failure {
                        output.fallback = Some(format!(
                            "{} failed ({}). Using {}.",
                            failed,
                            error,
                            provider.name()
                        ));
                    }
                    return Ok(output);
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "image generation failed");
                    first_failure.get_or_insert_with(|| (provider.name(), e.to_string()));
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| self.no_provider()))
    }

    async fn generate_text(&self, request: &TextRequest) -> Result<String, HeroError> {
        let mut last_error = None;
        for provider in &self.providers {
            match provider.generate_text(request).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => {
                    tracing::warn!(provider = provider.name(), "text generation returned nothing");
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "text generation failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| self.no_provider()))
    }

    async fn generate_storyline(&self, request: &StorylineRequest) -> Result<String, HeroError> {
        let mut last_error = None;
        let mut attempted = false;
        for provider in &self.providers {
            if request.video.is_some() && !provider.supports_video() {
                continue;
            }
            attempted = true;
            match provider.generate_storyline(request).await {
                Ok(text) if !text.trim().is_empty() => {
                    tracing::debug!(provider = provider.name(), "storyline generated");
                    return Ok(text);
                }
                Ok(_) => {
                    tracing::warn!(provider = provider.name(), "storyline generation returned nothing");
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "storyline generation failed");
                    last_error = Some(e);
                }
            }
        }

        if !attempted && request.video.is_some() {
            return Err(HeroError::NoProvider(
                "Video analysis requires GOOGLE_AI_API_KEY (Gemini).".to_string(),
            ));
        }
        Err(last_error.unwrap_or_else(|| self.no_provider()))
    }
}

/// API keys read from the environment.
#[derive(Clone, Default)]
pub struct ProviderKeys {
    pub openai: Option<String>,
    pub anthropic: Option<String>,
    pub google: Option<String>,
}

impl std::fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderKeys")
            .field("openai", &self.openai.is_some())
            .field("anthropic", &self.anthropic.is_some())
            .field("google", &self.google.is_some())
            .finish()
    }
}

impl ProviderKeys {
    /// Drop blank keys.
    pub fn normalized(self) -> Self {
        let keep = |k: Option<String>| k.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
        Self {
            openai: keep(self.openai),
            anthropic: keep(self.anthropic),
            google: keep(self.google),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.openai.is_none() && self.anthropic.is_none() && self.google.is_none()
    }
}

/// Per-capability provider chains.
#[derive(Clone)]
pub struct Providers {
    pub image: FallbackChain,
    pub text: FallbackChain,
    pub storyline: FallbackChain,
}

impl Providers {
    pub fn from_keys(keys: &ProviderKeys, timeout: Duration) -> Result<Self, HeroError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hero-studio/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| HeroError::Provider(format!("HTTP client error: {}", e)))?;

        let gemini = keys
            .google
            .clone()
            .map(|key| Arc::new(gemini::GeminiAdapter::new(client.clone(), key)) as Arc<dyn GenerationAdapter>);
        let openai = keys
            .openai
            .clone()
            .map(|key| Arc::new(openai::OpenAiAdapter::new(client.clone(), key)) as Arc<dyn GenerationAdapter>);
        let anthropic = keys
            .anthropic
            .clone()
            .map(|key| Arc::new(anthropic::AnthropicAdapter::new(client.clone(), key)) as Arc<dyn GenerationAdapter>);

        let chain = |message: &str, members: Vec<&Option<Arc<dyn GenerationAdapter>>>| {
            members
                .into_iter()
                .flatten()
                .fold(FallbackChain::new(message), |chain, p| chain.with(p.clone()))
        };

        let image = chain("No image provider configured.", vec![&gemini, &openai])
            .with(Arc::new(placeholder::PlaceholderAdapter));
        let text = chain(
            "No text provider configured. Add GOOGLE_AI_API_KEY or OPENAI_API_KEY.",
            vec![&gemini, &openai],
        );
        let storyline = chain(
            "No AI provider configured. Add ANTHROPIC_API_KEY, GOOGLE_AI_API_KEY, or OPENAI_API_KEY.",
            vec![&anthropic, &gemini, &openai],
        );

        tracing::info!(
            image = ?image.names(),
            text = ?text.names(),
            storyline = ?storyline.names(),
            "generation providers configured"
        );

        Ok(Self { image, text, storyline })
    }
}

/// Send a JSON request and return the parsed JSON body, or a provider error
/// carrying the response text.
pub(crate) async fn send_json(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, HeroError> {
    let response = request
        .send()
        .await
        .map_err(|e| HeroError::Provider(format!("{} request failed: {}", provider, e)))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(HeroError::Provider(format!("{} API error ({}): {}", provider, status, body)));
    }
    response
        .json()
        .await
        .map_err(|e| HeroError::Provider(format!("{} returned invalid JSON: {}", provider, e)))
}
