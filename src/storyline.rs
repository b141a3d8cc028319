//! # Storyline
//!
//! Scene records for WHY → HOW → WHAT product demo storylines, and the prompts
//! and merges around them. Generation itself is delegated to a
//! [`GenerationAdapter`]; this module only builds prompts and turns the raw
//! response into [`Scene`]s.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HeroError;
use crate::generate::{GenerationAdapter, StorylineRequest, VideoClip};

/// Maximum accepted recording size.
pub const MAX_VIDEO_BYTES: usize = 50 * 1024 * 1024;

pub const STORYLINE_SYSTEM_PROMPT: &str = "You are an expert scriptwriter for product demo motion graphics. Output a JSON array of scenes only. No other text, no markdown code blocks, no explanation. Each scene must have exactly these string fields: title, description (1-2 short sentences), voiceoverScript, suggestedVisuals (concise animation/visual suggestions), summary (1 sentence). Follow WHY → HOW → WHAT flow. Example: [{\"title\":\"...\",\"description\":\"...\",\"voiceoverScript\":\"...\",\"suggestedVisuals\":\"...\",\"summary\":\"...\"}]";

pub const REGENERATE_SYSTEM_PROMPT: &str = "You are an expert scriptwriter for product demo motion graphics. Output a single JSON object with keys: title, description (short), voiceoverScript, suggestedVisuals, summary. No other text.";

/// One scene of a storyline.
///
/// `id` and `index` are assigned at creation and survive every regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub index: usize,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub voiceover_script: String,
    #[serde(default)]
    pub suggested_visuals: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_generating_image: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regeneration_comments: Option<String>,
}

/// Text fields as produced by a model; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub voiceover_script: Option<String>,
    #[serde(default)]
    pub suggested_visuals: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl Scene {
    /// Build scene `index` (1-based) from a payload with a fresh id.
    pub fn from_payload(index: usize, payload: ScenePayload) -> Self {
        let title = payload
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Scene {}", index));
        Self {
            id: Uuid::new_v4().to_string(),
            index,
            title,
            description: payload.description.unwrap_or_default(),
            voiceover_script: payload.voiceover_script.unwrap_or_default(),
            suggested_visuals: payload.suggested_visuals.unwrap_or_default(),
            summary: payload.summary.unwrap_or_default(),
            image_url: None,
            is_generating_image: None,
            regeneration_comments: None,
        }
    }

    /// Apply regenerated text, keeping identity, ordering and the illustration.
    pub fn merged_with(&self, payload: ScenePayload) -> Self {
        Self {
            id: self.id.clone(),
            index: self.index,
            title: payload.title.unwrap_or_else(|| self.title.clone()),
            description: payload.description.unwrap_or_else(|| self.description.clone()),
            voiceover_script: payload
                .voiceover_script
                .unwrap_or_else(|| self.voiceover_script.clone()),
            suggested_visuals: payload
                .suggested_visuals
                .unwrap_or_else(|| self.suggested_visuals.clone()),
            summary: payload.summary.unwrap_or_else(|| self.summary.clone()),
            image_url: self.image_url.clone(),
            is_generating_image: self.is_generating_image,
            regeneration_comments: self.regeneration_comments.clone(),
        }
    }

    fn text_payload(&self) -> ScenePayload {
        ScenePayload {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            voiceover_script: Some(self.voiceover_script.clone()),
            suggested_visuals: Some(self.suggested_visuals.clone()),
            summary: Some(self.summary.clone()),
        }
    }

    /// Prompt for a 16:9 illustration of this scene.
    pub fn image_prompt(&self) -> String {
        format!(
            "Title: {}. Description: {}. Visual style: {}. Simple motion graphics, clean and professional.",
            self.title, self.description, self.suggested_visuals
        )
    }
}

/// How the user supplied the storyline material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Voiceover,
    Scratch,
    Recording,
}

/// WHY / HOW / WHAT building blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScratchInput {
    #[serde(default)]
    pub why: String,
    #[serde(default)]
    pub how: String,
    #[serde(default)]
    pub what: String,
}

/// Validated storyline input.
#[derive(Debug, Clone)]
pub enum StorylineInput {
    Voiceover { script: String },
    Scratch(ScratchInput),
    /// A screen recording, optionally with a written description.
    Recording {
        clip: Option<VideoClip>,
        description: String,
    },
}

impl StorylineInput {
    pub fn input_type(&self) -> InputType {
        match self {
            StorylineInput::Voiceover { .. } => InputType::Voiceover,
            StorylineInput::Scratch(_) => InputType::Scratch,
            StorylineInput::Recording { .. } => InputType::Recording,
        }
    }

    /// User prompt for the storyline model.
    pub fn prompt(&self) -> String {
        match self {
            StorylineInput::Voiceover { script } => format!(
                "Create a product demo motion graphic storyline from this voiceover script. Structure it scene by scene following WHY (problem/purpose) → HOW (solution/process) → WHAT (result).\n\nVOICEOVER SCRIPT:\n{}",
                script
            ),
            StorylineInput::Scratch(input) => format!(
                "Create a product demo motion graphic storyline from these building blocks. Structure it scene by scene following WHY → HOW → WHAT.\n\nWHY (Pain point / problem / purpose):\n{}\n\nHOW (Solution / process):\n{}\n\nWHAT (The result):\n{}",
                input.why, input.how, input.what
            ),
            StorylineInput::Recording { clip: Some(_), .. } => {
                "Watch this product demo / screen recording video. Create a scene-by-scene storyline that captures what happens and what is said. Structure it following WHY (problem/purpose) → HOW (solution/process) → WHAT (result). Output only the JSON array of scenes, no other text.".to_string()
            }
            StorylineInput::Recording { clip: None, description } => format!(
                "Create a product demo motion graphic storyline from this description of a screen recording. Structure it scene by scene following WHY (problem/purpose) → HOW (solution/process) → WHAT (result).\n\nRECORDING:\n{}",
                description
            ),
        }
    }

    pub fn into_request(self) -> StorylineRequest {
        let prompt = self.prompt();
        let video = match self {
            StorylineInput::Recording { clip, .. } => clip,
            _ => None,
        };
        StorylineRequest {
            system: STORYLINE_SYSTEM_PROMPT.to_string(),
            prompt,
            video,
        }
    }
}

/// Canned instructions for the length buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustField {
    Description,
    Voiceover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustDirection {
    Shorten,
    Expand,
}

pub fn adjust_length_instruction(field: AdjustField, direction: AdjustDirection) -> &'static str {
    match (field, direction) {
        (AdjustField::Description, AdjustDirection::Shorten) => {
            "Make the description shorter and more concise. Keep everything else unchanged."
        }
        (AdjustField::Description, AdjustDirection::Expand) => {
            "Expand the description with a bit more detail. Keep everything else unchanged."
        }
        (AdjustField::Voiceover, AdjustDirection::Shorten) => {
            "Make the voiceover script shorter and more concise. Keep everything else unchanged."
        }
        (AdjustField::Voiceover, AdjustDirection::Expand) => {
            "Expand the voiceover script with more detail. Keep everything else unchanged."
        }
    }
}

/// User prompt asking for a single regenerated scene.
pub fn regenerate_prompt(scene: &Scene, comments: &str) -> String {
    let current = serde_json::to_string(&scene.text_payload()).unwrap_or_default();
    if comments.trim().is_empty() {
        format!(
            "Improve this scene (same structure). Return only valid JSON for this single scene object: title, description, voiceoverScript, suggestedVisuals, summary. No array, no markdown.\n\n{}",
            current
        )
    } else {
        format!(
            "Regenerate this scene with the following feedback. Keep the same structure (title, description, voiceoverScript, suggestedVisuals, summary). Return only valid JSON for this single scene object, no array, no markdown.\n\nCurrent scene: {}\n\nUser feedback: {}",
            current, comments
        )
    }
}

/// Remove a surrounding markdown code fence.
fn strip_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").or_else(|| rest.strip_prefix("JSON")).unwrap_or(rest);
        text = text.strip_suffix("```").unwrap_or(text);
    }
    text.trim()
}

/// Parse a model response into scenes with fresh ids and 1-based indices.
///
/// Accepts a JSON array of scene objects or a single object.
pub fn parse_scenes(raw: &str) -> Result<Vec<Scene>, HeroError> {
    let cleaned = strip_fence(raw);
    let payloads: Vec<ScenePayload> = match serde_json::from_str(cleaned) {
        Ok(list) => list,
        Err(_) => {
            let single: ScenePayload = serde_json::from_str(cleaned).map_err(|e| {
                tracing::warn!(error = %e, "storyline response was not valid scene JSON");
                HeroError::Provider(
                    "AI did not return valid scene JSON. Try again or use a shorter input.".to_string(),
                )
            })?;
            vec![single]
        }
    };

    Ok(payloads
        .into_iter()
        .enumerate()
        .map(|(i, payload)| Scene::from_payload(i + 1, payload))
        .collect())
}

/// Parse a single regenerated scene object.
pub fn parse_scene_payload(raw: &str) -> Result<ScenePayload, HeroError> {
    serde_json::from_str(strip_fence(raw)).map_err(|e| {
        tracing::warn!(error = %e, "regenerated scene was not valid JSON");
        HeroError::Provider("AI did not return a valid scene object.".to_string())
    })
}

/// Generate a fresh storyline.
pub async fn generate_storyline(
    adapter: &dyn GenerationAdapter,
    input: StorylineInput,
) -> Result<Vec<Scene>, HeroError> {
    let input_type = input.input_type();
    let raw = adapter.generate_storyline(&input.into_request()).await?;
    let scenes = parse_scenes(&raw)?;
    tracing::info!(?input_type, scenes = scenes.len(), "generated storyline");
    Ok(scenes)
}

/// Regenerate one scene with optional feedback; id and index are preserved.
pub async fn regenerate_scene(
    adapter: &dyn GenerationAdapter,
    scene: &Scene,
    comments: &str,
) -> Result<Scene, HeroError> {
    let request = StorylineRequest {
        system: REGENERATE_SYSTEM_PROMPT.to_string(),
        prompt: regenerate_prompt(scene, comments),
        video: None,
    };
    let raw = adapter.generate_storyline(&request).await?;
    Ok(scene.merged_with(parse_scene_payload(&raw)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_array_assigns_indices() {
        let raw = r#"[{"title":"Why","description":"d1"},{"title":"","summary":"s"},{"title":"What"}]"#;
        let scenes = parse_scenes(raw).unwrap();
        assert_eq!(scenes.len(), 3);
        assert_eq!(scenes.iter().map(|s| s.index).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(scenes[1].title, "Scene 2");
        assert_eq!(scenes[1].summary, "s");
        assert_ne!(scenes[0].id, scenes[1].id);
    }

    #[test]
    fn test_parse_fenced_response() {
        let raw = "```json\n[{\"title\":\"A\",\"voiceoverScript\":\"v\"}]\n```";
        let scenes = parse_scenes(raw).unwrap();
        assert_eq!(scenes[0].voiceover_script, "v");
    }

    #[test]
    fn test_parse_single_object() {
        let scenes = parse_scenes(r#"{"title":"Only"}"#).unwrap();
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].index, 1);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(matches!(parse_scenes("sorry, no"), Err(HeroError::Provider(_))));
    }

    #[test]
    fn test_merge_preserves_identity() {
        let mut scene = Scene::from_payload(4, ScenePayload {
            title: Some("Old".into()),
            description: Some("old desc".into()),
            ..Default::default()
        });
        scene.image_url = Some("data:image/png;base64,AA==".into());
        let merged = scene.merged_with(ScenePayload {
            description: Some("new desc".into()),
            ..Default::default()
        });
        assert_eq!(merged.id, scene.id);
        assert_eq!(merged.index, 4);
        assert_eq!(merged.title, "Old");
        assert_eq!(merged.description, "new desc");
        assert_eq!(merged.image_url, scene.image_url);
    }

    #[test]
    fn test_scene_json_shape() {
        let scene = Scene::from_payload(1, ScenePayload::default());
        let value = serde_json::to_value(&scene).unwrap();
        assert!(value.get("voiceoverScript").is_some());
        assert!(value.get("imageUrl").is_none());
    }

    #[test]
    fn test_prompts_mention_sections() {
        let scratch = StorylineInput::Scratch(ScratchInput {
            why: "slow exports".into(),
            how: "one click".into(),
            what: "done".into(),
        });
        let prompt = scratch.prompt();
        assert!(prompt.contains("WHY (Pain point"));
        assert!(prompt.contains("slow exports"));

        let with_comments = regenerate_prompt(&Scene::from_payload(1, ScenePayload::default()), "punchier");
        assert!(with_comments.contains("User feedback: punchier"));
    }

    #[test]
    fn test_adjust_instruction() {
        assert!(adjust_length_instruction(AdjustField::Voiceover, AdjustDirection::Expand)
            .contains("voiceover script"));
    }
}
