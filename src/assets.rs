//! # Image Acquisition
//!
//! Resolves background and logo references into decoded images.
//!
//! A reference is one of:
//!
//! | Form | Example | Handling |
//! |------|---------|----------|
//! | Remote | `https://cdn.example.com/bg.png` | Downloaded with the shared HTTP client |
//! | Inline | `data:image/png;base64,iVBOR...` | Base64 payload decoded in place |
//! | Site-relative | `/logo/Logo-dark.png` | Joined onto the configured public base URL |
//! | Ephemeral | `blob:http://localhost/…` | Rejected before any fetch |
//!
//! Timeouts live here; every failure is reported as
//! [`HeroError::AssetUnavailable`] naming the slot.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::DynamicImage;
use serde::Serialize;
use std::time::Duration;

use crate::error::HeroError;

/// Which layer an asset feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSlot {
    Background,
    Logo,
}

impl AssetSlot {
    pub fn label(&self) -> &'static str {
        match self {
            AssetSlot::Background => "background",
            AssetSlot::Logo => "logo",
        }
    }

    /// What the user should do when this asset is unavailable.
    pub fn guidance(&self) -> &'static str {
        match self {
            AssetSlot::Background => "Generate a new background and try again.",
            AssetSlot::Logo => "Re-upload the logo and try again.",
        }
    }
}

impl std::fmt::Display for AssetSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A parsed asset reference.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetRef {
    Remote(String),
    Inline { mime: String, bytes: Vec<u8> },
    SiteRelative(String),
}

impl AssetRef {
    /// Parse a raw reference for `slot`.
    ///
    /// Ephemeral `blob:` handles and unknown schemes are rejected here so the
    /// caller never attempts to dereference them.
    pub fn parse(slot: AssetSlot, raw: &str) -> Result<Self, HeroError> {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();

        if lower.starts_with("blob:") {
            return Err(HeroError::asset_ephemeral(slot));
        }
        if lower.starts_with("data:") {
            return parse_data_uri(slot, raw);
        }
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(AssetRef::Remote(raw.to_string()));
        }
        if raw.starts_with('/') && !raw.starts_with("//") {
            return Ok(AssetRef::SiteRelative(raw.to_string()));
        }

        Err(HeroError::asset_unreadable(slot, "unsupported reference"))
    }

    /// Short description for logs; never includes inline payloads.
    pub fn describe(&self) -> String {
        match self {
            AssetRef::Remote(url) => url.clone(),
            AssetRef::Inline { mime, bytes } => format!("data:{} ({} bytes)", mime, bytes.len()),
            AssetRef::SiteRelative(path) => path.clone(),
        }
    }
}

/// Parse `data:[<mime>][;base64],<payload>`. Only base64 payloads are accepted.
fn parse_data_uri(slot: AssetSlot, raw: &str) -> Result<AssetRef, HeroError> {
    let rest = &raw["data:".len()..];
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| HeroError::asset_unreadable(slot, "malformed data URI"))?;

    let mut parts = header.split(';');
    let mime = parts.next().unwrap_or("").trim();
    let mime = if mime.is_empty() { "text/plain" } else { mime };
    let is_base64 = parts.any(|p| p.trim().eq_ignore_ascii_case("base64"));
    if !is_base64 {
        return Err(HeroError::asset_unreadable(slot, "data URI is not base64 encoded"));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| HeroError::asset_unreadable(slot, format!("invalid base64: {}", e)))?;

    Ok(AssetRef::Inline {
        mime: mime.to_string(),
        bytes,
    })
}

/// Encode bytes as a base64 data URI.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Fetches and decodes assets.
#[derive(Debug, Clone)]
pub struct ImageAcquirer {
    http_client: reqwest::Client,
    public_base_url: Option<String>,
}

impl ImageAcquirer {
    /// Create an acquirer with a request timeout.
    ///
    /// `public_base_url` resolves site-relative references such as
    /// `/logo/Logo-dark.png`; without it they are unavailable.
    pub fn new(timeout: Duration, public_base_url: Option<String>) -> Result<Self, HeroError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("hero-studio/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| HeroError::CompositionFailed(format!("HTTP client error: {}", e)))?;
        Ok(Self::with_client(http_client, public_base_url))
    }

    pub fn with_client(http_client: reqwest::Client, public_base_url: Option<String>) -> Self {
        Self {
            http_client,
            public_base_url: public_base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Raw bytes behind a reference.
    pub async fn fetch_bytes(&self, slot: AssetSlot, reference: &AssetRef) -> Result<Vec<u8>, HeroError> {
        match reference {
            AssetRef::Inline { bytes, .. } => Ok(bytes.clone()),
            AssetRef::Remote(url) => self.download(slot, url).await,
            AssetRef::SiteRelative(path) => {
                let base = self.public_base_url.as_deref().ok_or_else(|| {
                    HeroError::asset_unreadable(slot, "relative reference without a public base URL")
                })?;
                self.download(slot, &format!("{}{}", base, path)).await
            }
        }
    }

    async fn download(&self, slot: AssetSlot, url: &str) -> Result<Vec<u8>, HeroError> {
        tracing::debug!(%slot, %url, "downloading asset");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| HeroError::asset_unreadable(slot, format!("download failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(HeroError::asset_unreadable(
                slot,
                format!("HTTP {}", response.status()),
            ));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HeroError::asset_unreadable(slot, format!("read failed: {}", e)))?;
        Ok(bytes.to_vec())
    }

    /// Fetch and decode a reference.
    pub async fn load(&self, slot: AssetSlot, reference: &AssetRef) -> Result<DynamicImage, HeroError> {
        let bytes = self.fetch_bytes(slot, reference).await?;
        let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| HeroError::CompositionFailed(format!("Decode task error: {}", e)))?
            .map_err(|e| HeroError::asset_unreadable(slot, format!("decode failed: {}", e)))?;
        tracing::debug!(%slot, width = image.width(), height = image.height(), "decoded asset");
        Ok(image)
    }

    /// Load an optional reference that has already been parsed.
    pub async fn load_optional(
        &self,
        slot: AssetSlot,
        reference: Option<&AssetRef>,
    ) -> Result<Option<DynamicImage>, HeroError> {
        match reference {
            Some(reference) => self.load(slot, reference).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Treat an empty or whitespace-only reference as absent.
pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
