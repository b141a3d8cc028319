//! Storyline generation handlers.

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{is_multipart, json_body};
use crate::error::HeroError;
use crate::generate::VideoClip;
use crate::store::StorylineState;
use crate::storyline::{
    self, AdjustDirection, AdjustField, InputType, MAX_VIDEO_BYTES, Scene, ScratchInput, StorylineInput,
};

use super::super::state::AppState;

/// JSON body for text-based storylines.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub input_type: InputType,
    #[serde(default)]
    pub voiceover_script: String,
    #[serde(default)]
    pub scratch_input: ScratchInput,
    #[serde(default)]
    pub recording_description: String,
}

impl GenerateRequest {
    fn into_input(self) -> Result<StorylineInput, HeroError> {
        match self.input_type {
            InputType::Voiceover if !self.voiceover_script.trim().is_empty() => Ok(StorylineInput::Voiceover {
                script: self.voiceover_script,
            }),
            InputType::Scratch
                if [&self.scratch_input.why, &self.scratch_input.how, &self.scratch_input.what]
                    .iter()
                    .any(|s| !s.trim().is_empty()) =>
            {
                Ok(StorylineInput::Scratch(self.scratch_input))
            }
            InputType::Recording if !self.recording_description.trim().is_empty() => Ok(StorylineInput::Recording {
                clip: None,
                description: self.recording_description,
            }),
            _ => Err(HeroError::InvalidInput("Invalid inputType or missing input".to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScenesResponse {
    pub scenes: Vec<Scene>,
}

/// Read a multipart recording upload.
async fn recording_input(mut multipart: Multipart) -> Result<StorylineInput, HeroError> {
    let mut input_type = String::new();
    let mut description = String::new();
    let mut clip = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HeroError::InvalidInput(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "inputType" => {
                input_type = field
                    .text()
                    .await
                    .map_err(|e| HeroError::InvalidInput(format!("Failed to read inputType: {}", e)))?;
            }
            "recordingDescription" => {
                description = field
                    .text()
                    .await
                    .map_err(|e| HeroError::InvalidInput(format!("Failed to read recordingDescription: {}", e)))?;
            }
            "recording" => {
                let mime = field
                    .content_type()
                    .filter(|m| m.starts_with("video/"))
                    .unwrap_or("video/mp4")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| HeroError::InvalidInput(format!("Failed to read recording: {}", e)))?;
                if bytes.len() > MAX_VIDEO_BYTES {
                    return Err(HeroError::InvalidInput(format!(
                        "Video must be under {}MB.",
                        MAX_VIDEO_BYTES / (1024 * 1024)
                    )));
                }
                if !bytes.is_empty() {
                    clip = Some(VideoClip {
                        mime,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    if input_type != "recording" || clip.is_none() {
        return Err(HeroError::InvalidInput(
            "For recording, upload a video file (multipart field 'recording').".to_string(),
        ));
    }
    Ok(StorylineInput::Recording { clip, description })
}

fn remember_input(store: &mut StorylineState, input: &StorylineInput) {
    store.set_input_type(Some(input.input_type()));
    match input {
        StorylineInput::Voiceover { script } => store.set_voiceover_script(script.clone()),
        StorylineInput::Scratch(scratch) => store.set_scratch_input(scratch.clone()),
        StorylineInput::Recording { description, .. } => store.set_recording_description(description.clone()),
    }
}

/// POST /api/storyline/generate - Scene-by-scene storyline from a script,
/// building blocks, or a screen recording (multipart field `recording`).
pub async fn generate(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ScenesResponse>, HeroError> {
    let input = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| HeroError::InvalidInput(format!("Multipart error: {}", e)))?;
        recording_input(multipart).await?
    } else {
        let Json(body) = Json::<GenerateRequest>::from_request(request, &())
            .await
            .map_err(|e| HeroError::InvalidInput(e.body_text()))?;
        body.into_input()?
    };

    {
        let mut store = state.storyline.write().await;
        remember_input(&mut store, &input);
        store.set_generating(true);
        store.set_error(None);
    }

    let result = storyline::generate_storyline(&state.providers.storyline, input).await;

    let mut store = state.storyline.write().await;
    store.set_generating(false);
    match result {
        Ok(scenes) => {
            store.set_scenes(scenes.clone());
            Ok(Json(ScenesResponse { scenes }))
        }
        Err(e) => {
            store.set_error(Some(e.to_string()));
            Err(e)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdjustLength {
    pub field: AdjustField,
    pub direction: AdjustDirection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequest {
    #[serde(default)]
    pub scene_id: Option<String>,
    #[serde(default)]
    pub comments: String,
    /// Scene as the client sees it; looked up by id when absent.
    #[serde(default)]
    pub scene: Option<Scene>,
    /// Canned shorten/expand instruction; replaces `comments`.
    #[serde(default)]
    pub adjust: Option<AdjustLength>,
}

#[derive(Debug, Serialize)]
pub struct SceneResponse {
    pub scene: Scene,
}

/// POST /api/storyline/regenerate-scene - Rewrite one scene, keeping its id and index.
pub async fn regenerate_scene(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegenerateRequest>, JsonRejection>,
) -> Result<Json<SceneResponse>, HeroError> {
    let request = json_body(payload)?;

    let scene = match (request.scene, request.scene_id.as_deref()) {
        (Some(scene), _) => scene,
        (None, Some(id)) => state
            .storyline
            .read()
            .await
            .scene(id)
            .cloned()
            .ok_or_else(|| HeroError::InvalidInput(format!("Unknown scene: {}", id)))?,
        (None, None) => return Err(HeroError::InvalidInput("scene or sceneId is required".to_string())),
    };

    let comments = match &request.adjust {
        Some(adjust) => storyline::adjust_length_instruction(adjust.field, adjust.direction).to_string(),
        None => request.comments,
    };

    if request.adjust.is_none() && !comments.trim().is_empty() {
        state
            .storyline
            .write()
            .await
            .set_regeneration_comments(&scene.id, comments.clone());
    }

    let regenerated = storyline::regenerate_scene(&state.providers.storyline, &scene, &comments).await?;
    state
        .storyline
        .write()
        .await
        .replace_scene(&scene.id, regenerated.clone());

    tracing::info!(scene = %regenerated.id, index = regenerated.index, "regenerated scene");
    Ok(Json(SceneResponse { scene: regenerated }))
}

/// GET /api/storyline/state - Current storyline state.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StorylineState> {
    Json(state.storyline.read().await.clone())
}

/// POST /api/storyline/reset - Clear scenes and inputs.
pub async fn reset(State(state): State<Arc<AppState>>) -> Json<StorylineState> {
    let mut store = state.storyline.write().await;
    store.reset();
    Json(store.clone())
}
