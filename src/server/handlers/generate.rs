//! Image and copy generation handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::json_body;
use crate::error::HeroError;
use crate::generate::{
    AspectRatio, CopyKind, GeneratedCopy, GenerationAdapter, ImageOutput, ImageRequest, TextRequest,
    copy::{COPY_MAX_TOKENS, COPY_SYSTEM_PROMPT, copy_prompt},
    fallback_copy, parse_copy,
    prompts::{ImageContext, LOGO_OPTIONS, LogoOption, PROMPT_GUIDELINES, PromptGuideline},
};

use super::super::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub context: ImageContext,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    /// Storyline scene to attach the image to.
    #[serde(default)]
    pub scene_id: Option<String>,
}

/// POST /api/generate-image - Generate a background or scene frame.
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Json<ImageOutput>, HeroError> {
    let request = json_body(payload)?;
    if request.prompt.trim().is_empty() {
        return Err(HeroError::InvalidInput("Prompt is required".to_string()));
    }

    let aspect = match (&request.aspect_ratio, request.context) {
        (Some(name), _) => AspectRatio::from_name(name),
        (None, ImageContext::Storyline) => AspectRatio::Widescreen,
        (None, ImageContext::Hero) => AspectRatio::Square,
    };
    let image_request = ImageRequest {
        prompt: request.context.full_prompt(&request.prompt),
        aspect,
    };

    match (request.context, request.scene_id.as_deref()) {
        (ImageContext::Hero, _) => {
            let mut hero = state.hero.write().await;
            hero.set_generating(true);
            hero.set_background_error(None);
        }
        (ImageContext::Storyline, Some(id)) => {
            state.storyline.write().await.set_scene_generating_image(id, true);
        }
        (ImageContext::Storyline, None) => {}
    }

    let result = state.providers.image.generate_image(&image_request).await;

    match request.context {
        ImageContext::Hero => {
            let mut hero = state.hero.write().await;
            hero.set_generating(false);
            match &result {
                Ok(output) => {
                    hero.add_generated_image(output.url.clone(), request.prompt.trim());
                }
                Err(e) => hero.set_background_error(Some(e.to_string())),
            }
        }
        ImageContext::Storyline => {
            if let Some(id) = request.scene_id.as_deref() {
                let mut storyline = state.storyline.write().await;
                match &result {
                    Ok(output) => storyline.set_scene_image(id, Some(output.url.clone())),
                    Err(_) => storyline.set_scene_generating_image(id, false),
                };
            }
        }
    }

    let output = result?;
    tracing::info!(engine = %output.engine, context = ?request.context, "generated image");
    Ok(Json(output))
}

#[derive(Debug, Deserialize)]
pub struct GenerateTextRequest {
    #[serde(default)]
    pub context: String,
    #[serde(default, rename = "type")]
    pub kind: CopyKind,
}

/// POST /api/generate-text - Title and/or description copy.
///
/// Falls back to built-in copy when no provider answers.
pub async fn generate_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateTextRequest>, JsonRejection>,
) -> Result<Json<GeneratedCopy>, HeroError> {
    let request = json_body(payload)?;
    let text_request = TextRequest {
        system: COPY_SYSTEM_PROMPT.to_string(),
        prompt: copy_prompt(request.kind, &request.context),
        max_tokens: COPY_MAX_TOKENS,
    };

    state.hero.write().await.set_generating_text(true);
    let copy = match state.providers.text.generate_text(&text_request).await {
        Ok(content) => parse_copy(&content, request.kind),
        Err(e) => {
            tracing::warn!(error = %e, "using fallback copy");
            fallback_copy(request.kind)
        }
    };
    state.hero.write().await.set_generating_text(false);

    Ok(Json(copy))
}

#[derive(Debug, Serialize)]
pub struct Presets {
    pub prompts: &'static [PromptGuideline],
    pub logos: &'static [LogoOption],
}

/// GET /api/presets - Curated background prompts and bundled logos.
pub async fn presets() -> Json<Presets> {
    Json(Presets {
        prompts: PROMPT_GUIDELINES,
        logos: LOGO_OPTIONS,
    })
}

#[derive(Debug, Serialize)]
pub struct EnvStatus {
    #[serde(rename = "GOOGLE_AI_API_KEY")]
    pub google: &'static str,
    #[serde(rename = "OPENAI_API_KEY")]
    pub openai: &'static str,
    #[serde(rename = "ANTHROPIC_API_KEY")]
    pub anthropic: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

fn presence(key: &Option<String>) -> &'static str {
    if key.as_deref().is_some_and(|k| !k.trim().is_empty()) { "set" } else { "missing" }
}

/// GET /api/check-env - Which provider keys the server sees.
pub async fn check_env(State(state): State<Arc<AppState>>) -> Json<EnvStatus> {
    let keys = &state.config.providers;
    let hint = keys
        .is_empty()
        .then_some("Set GOOGLE_AI_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY and restart the server.");
    Json(EnvStatus {
        google: presence(&keys.google),
        openai: presence(&keys.openai),
        anthropic: presence(&keys.anthropic),
        hint,
    })
}
