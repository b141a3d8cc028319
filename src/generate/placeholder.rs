//! Stock-photo placeholder used when no image provider is configured.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use super::{AspectRatio, GenerationAdapter, ImageOutput, ImageRequest};
use crate::error::HeroError;

/// Always succeeds with a deterministic picsum.photos URL for the prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderAdapter;

/// Seed derived from the first bytes of the prompt.
pub fn placeholder_url(prompt: &str, aspect: AspectRatio) -> String {
    let seed: String = URL_SAFE_NO_PAD.encode(prompt.as_bytes()).chars().take(20).collect();
    let (w, h) = match aspect {
        AspectRatio::Square => (1024, 1024),
        AspectRatio::Widescreen => (1024, 576),
    };
    format!("https://picsum.photos/seed/{}/{}/{}", seed, w, h)
}

#[async_trait]
impl GenerationAdapter for PlaceholderAdapter {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageOutput, HeroError> {
        Ok(ImageOutput {
            url: placeholder_url(&request.prompt, request.aspect),
            engine: self.name().to_string(),
            fallback: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholder_is_deterministic() {
        let a = placeholder_url("isometric servers", AspectRatio::Square);
        assert_eq!(a, placeholder_url("isometric servers", AspectRatio::Square));
        assert!(a.starts_with("https://picsum.photos/seed/"));
        assert!(a.ends_with("/1024/1024"));
        let seed = a.split('/').nth(4).unwrap();
        assert_eq!(seed.len(), 20);
        assert!(!seed.contains('+') && !seed.contains('/'));
    }

    #[tokio::test]
    async fn test_placeholder_never_fails() {
        let request = ImageRequest {
            prompt: String::new(),
            aspect: AspectRatio::Widescreen,
        };
        let output = PlaceholderAdapter.generate_image(&request).await.unwrap();
        assert_eq!(output.engine, "placeholder");
        assert!(output.url.ends_with("/1024/576"));
    }
}
