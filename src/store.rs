//! # State Store
//!
//! Editor state for the hero builder and the storyline tool. Both are plain
//! serializable values; the server keeps one of each behind a lock and the
//! compositors read snapshots.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::brand;
use crate::layout::{LogoPosition, LogoSpec};
use crate::storyline::{InputType, ScratchInput, Scene};

/// A background produced by the image generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
    pub prompt: String,
}

/// Hero builder state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroState {
    pub prompt: String,
    pub generated_images: Vec<GeneratedImage>,
    pub selected_background_url: Option<String>,
    pub is_generating: bool,
    pub background_error: Option<String>,
    pub logo_url: Option<String>,
    pub logo_position: LogoPosition,
    pub logo_scale: f32,
    pub logo_padding: f32,
    pub title: String,
    pub description: String,
    pub is_generating_text: bool,
    pub media_library: Vec<String>,
    /// Bumped on every mutation; lets readers order snapshots.
    pub revision: u64,
}

impl Default for HeroState {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            generated_images: Vec::new(),
            selected_background_url: None,
            is_generating: false,
            background_error: None,
            logo_url: None,
            logo_position: LogoPosition::BottomRight,
            logo_scale: 1.0,
            logo_padding: brand::LOGO_PADDING_PX,
            title: String::new(),
            description: String::new(),
            is_generating_text: false,
            media_library: Vec::new(),
            revision: 0,
        }
    }
}

/// Partial update for [`HeroState`]; absent fields are left alone.
///
/// Nullable references use a nested option: `"logoUrl": null` clears the
/// logo, omitting the key keeps it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroPatch {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, with = "nullable")]
    pub selected_background_url: Option<Option<String>>,
    #[serde(default, with = "nullable")]
    pub logo_url: Option<Option<String>>,
    #[serde(default)]
    pub logo_position: Option<LogoPosition>,
    #[serde(default)]
    pub logo_scale: Option<f32>,
    #[serde(default)]
    pub logo_padding: Option<f32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

mod nullable {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}

impl HeroState {
    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.touch();
        self.prompt = prompt.into();
    }

    pub fn set_selected_background(&mut self, url: Option<String>) {
        self.touch();
        self.selected_background_url = url.filter(|u| !u.trim().is_empty());
        self.background_error = None;
    }

    pub fn set_generating(&mut self, generating: bool) {
        self.touch();
        self.is_generating = generating;
    }

    pub fn set_background_error(&mut self, error: Option<String>) {
        self.touch();
        self.background_error = error;
    }

    pub fn set_logo(&mut self, url: Option<String>) {
        self.touch();
        self.logo_url = url.filter(|u| !u.trim().is_empty());
    }

    pub fn set_logo_position(&mut self, position: LogoPosition) {
        self.touch();
        self.logo_position = position;
    }

    /// Scale is clamped to the brand range.
    pub fn set_logo_scale(&mut self, scale: f32) {
        self.touch();
        self.logo_scale = brand::clamp_logo_scale(scale);
    }

    pub fn set_logo_padding(&mut self, padding: f32) {
        self.touch();
        if padding.is_finite() {
            self.logo_padding = padding.max(0.0);
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.touch();
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.touch();
        self.description = description.into();
    }

    pub fn set_generating_text(&mut self, generating: bool) {
        self.touch();
        self.is_generating_text = generating;
    }

    /// Record a new background and select it.
    pub fn add_generated_image(&mut self, url: impl Into<String>, prompt: impl Into<String>) -> GeneratedImage {
        self.touch();
        let image = GeneratedImage {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            prompt: prompt.into(),
        };
        self.generated_images.insert(0, image.clone());
        self.set_selected_background(Some(image.url.clone()));
        image
    }

    /// Pick a logo the way the editor does: anchor it top-left at the
    /// editor's scale and padding, and keep it in the media library.
    pub fn select_logo(&mut self, url: impl Into<String>) {
        let url = url.into();
        self.set_logo(Some(url.clone()));
        self.set_logo_position(brand::LOGO_POSITION_UI_DEFAULT);
        self.set_logo_scale(brand::LOGO_SCALE_UI_DEFAULT);
        self.set_logo_padding(brand::LOGO_PADDING_UI_DEFAULT_PX);
        self.add_to_media_library(url);
    }

    /// Add a URL unless it is already present.
    pub fn add_to_media_library(&mut self, url: impl Into<String>) {
        self.touch();
        let url = url.into();
        if !self.media_library.contains(&url) {
            self.media_library.push(url);
        }
    }

    pub fn remove_from_media_library(&mut self, url: &str) {
        self.touch();
        self.media_library.retain(|u| u != url);
    }

    /// Restore defaults; the revision keeps counting.
    pub fn reset(&mut self) {
        let revision = self.revision;
        *self = Self::default();
        self.revision = revision + 1;
    }

    pub fn apply(&mut self, patch: HeroPatch) {
        self.touch();
        if let Some(prompt) = patch.prompt {
            self.set_prompt(prompt);
        }
        if let Some(url) = patch.selected_background_url {
            self.set_selected_background(url);
        }
        if let Some(url) = patch.logo_url {
            self.set_logo(url);
        }
        if let Some(position) = patch.logo_position {
            self.set_logo_position(position);
        }
        if let Some(scale) = patch.logo_scale {
            self.set_logo_scale(scale);
        }
        if let Some(padding) = patch.logo_padding {
            self.set_logo_padding(padding);
        }
        if let Some(title) = patch.title {
            self.set_title(title);
        }
        if let Some(description) = patch.description {
            self.set_description(description);
        }
    }

    pub fn logo_spec(&self) -> LogoSpec {
        LogoSpec::brand(self.logo_position, self.logo_scale, self.logo_padding)
    }

    /// Fields that change what the preview shows.
    pub fn render_fields(&self) -> RenderFields {
        RenderFields {
            background: self.selected_background_url.clone(),
            logo: self.logo_url.clone(),
            logo_position: self.logo_position,
            logo_scale_bits: self.logo_scale.to_bits(),
            logo_padding_bits: self.logo_padding.to_bits(),
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

/// Snapshot of the render-relevant part of [`HeroState`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderFields {
    pub background: Option<String>,
    pub logo: Option<String>,
    pub logo_position: LogoPosition,
    logo_scale_bits: u32,
    logo_padding_bits: u32,
    pub title: String,
    pub description: String,
}

/// Storyline tool state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorylineState {
    pub input_type: Option<InputType>,
    pub voiceover_script: String,
    pub scratch_input: ScratchInput,
    pub recording_description: String,
    pub scenes: Vec<Scene>,
    pub is_generating: bool,
    pub error: Option<String>,
}

impl StorylineState {
    pub fn set_input_type(&mut self, input_type: Option<InputType>) {
        self.input_type = input_type;
    }

    pub fn set_voiceover_script(&mut self, script: impl Into<String>) {
        self.voiceover_script = script.into();
    }

    pub fn set_scratch_input(&mut self, input: ScratchInput) {
        self.scratch_input = input;
    }

    pub fn set_recording_description(&mut self, description: impl Into<String>) {
        self.recording_description = description.into();
    }

    /// Replace the whole collection after a generation run.
    pub fn set_scenes(&mut self, scenes: Vec<Scene>) {
        self.scenes = scenes;
    }

    pub fn set_generating(&mut self, generating: bool) {
        self.is_generating = generating;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    fn scene_mut(&mut self, id: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id == id)
    }

    /// Attach an illustration; clears the generating flag. Returns false for
    /// an unknown id.
    pub fn set_scene_image(&mut self, id: &str, url: Option<String>) -> bool {
        match self.scene_mut(id) {
            Some(scene) => {
                scene.image_url = url;
                scene.is_generating_image = Some(false);
                true
            }
            None => false,
        }
    }

    pub fn set_scene_generating_image(&mut self, id: &str, generating: bool) -> bool {
        match self.scene_mut(id) {
            Some(scene) => {
                scene.is_generating_image = Some(generating);
                true
            }
            None => false,
        }
    }

    pub fn set_regeneration_comments(&mut self, id: &str, comments: impl Into<String>) -> bool {
        match self.scene_mut(id) {
            Some(scene) => {
                scene.regeneration_comments = Some(comments.into());
                true
            }
            None => false,
        }
    }

    /// Swap in a regenerated scene, keeping the stored id and index.
    pub fn replace_scene(&mut self, id: &str, replacement: Scene) -> bool {
        match self.scene_mut(id) {
            Some(scene) => {
                let (id, index) = (scene.id.clone(), scene.index);
                *scene = Scene { id, index, ..replacement };
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storyline::ScenePayload;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let state = HeroState::default();
        assert_eq!(state.logo_position, LogoPosition::BottomRight);
        assert_eq!(state.logo_scale, 1.0);
        assert_eq!(state.logo_padding, 32.0);
    }

    #[test]
    fn test_logo_scale_clamped() {
        let mut state = HeroState::default();
        state.set_logo_scale(5.0);
        assert_eq!(state.logo_scale, 2.0);
        state.set_logo_scale(0.1);
        assert_eq!(state.logo_scale, 0.5);
    }

    #[test]
    fn test_media_library_dedup() {
        let mut state = HeroState::default();
        state.add_to_media_library("a");
        state.add_to_media_library("b");
        state.add_to_media_library("a");
        assert_eq!(state.media_library, vec!["a".to_string(), "b".to_string()]);
        state.remove_from_media_library("a");
        assert_eq!(state.media_library, vec!["b".to_string()]);
    }

    #[test]
    fn test_generated_image_is_selected() {
        let mut state = HeroState::default();
        state.set_background_error(Some("boom".into()));
        let image = state.add_generated_image("https://x.test/1.png", "sky");
        assert_eq!(state.selected_background_url.as_deref(), Some("https://x.test/1.png"));
        assert_eq!(state.generated_images[0], image);
        assert!(state.background_error.is_none());
    }

    #[test]
    fn test_patch_null_clears_and_absent_keeps() {
        let mut state = HeroState::default();
        state.set_logo(Some("/logo/a.png".into()));
        state.set_title("Keep");

        let patch: HeroPatch = serde_json::from_str(r#"{"description":"New"}"#).unwrap();
        state.apply(patch);
        assert_eq!(state.logo_url.as_deref(), Some("/logo/a.png"));
        assert_eq!(state.description, "New");

        let patch: HeroPatch = serde_json::from_str(r#"{"logoUrl":null,"logoScale":3}"#).unwrap();
        state.apply(patch);
        assert!(state.logo_url.is_none());
        assert_eq!(state.logo_scale, 2.0);
        assert_eq!(state.title, "Keep");
    }

    #[test]
    fn test_render_fields_track_changes() {
        let mut state = HeroState::default();
        let before = state.render_fields();
        state.set_prompt("ignored by the preview");
        assert_eq!(before, state.render_fields());
        state.set_logo_padding(52.0);
        assert_ne!(before, state.render_fields());
    }

    #[test]
    fn test_select_logo_applies_editor_placement() {
        let mut state = HeroState::default();
        state.select_logo("/logo/Logo-dark.png");
        assert_eq!(state.logo_url.as_deref(), Some("/logo/Logo-dark.png"));
        assert_eq!(state.logo_position, LogoPosition::TopLeft);
        assert_eq!(state.logo_scale, 1.5);
        assert_eq!(state.logo_padding, 52.0);
        assert_eq!(state.media_library, vec!["/logo/Logo-dark.png".to_string()]);

        state.select_logo("/logo/Logo-dark.png");
        assert_eq!(state.media_library.len(), 1);
    }

    #[test]
    fn test_revision_advances_on_every_mutation() {
        let mut state = HeroState::default();
        assert_eq!(state.revision, 0);
        state.set_title("A");
        let after_title = state.revision;
        assert!(after_title > 0);

        state.apply(HeroPatch::default());
        assert!(state.revision > after_title);

        let before_reset = state.revision;
        state.reset();
        assert_eq!(state.revision, before_reset + 1);
        assert_eq!(state.title, "");
    }

    #[test]
    fn test_state_round_trips_camel_case() {
        let state = HeroState::default();
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["logoPosition"], "bottom-right");
        assert!(value.get("isGeneratingText").is_some());
    }

    fn storyline() -> StorylineState {
        let mut state = StorylineState::default();
        state.set_scenes(vec![
            Scene::from_payload(1, ScenePayload::default()),
            Scene::from_payload(2, ScenePayload::default()),
        ]);
        state
    }

    #[test]
    fn test_scene_image_clears_generating() {
        let mut state = storyline();
        let id = state.scenes[1].id.clone();
        assert!(state.set_scene_generating_image(&id, true));
        assert!(state.set_scene_image(&id, Some("data:image/png;base64,AA==".into())));
        assert_eq!(state.scenes[1].is_generating_image, Some(false));
        assert!(!state.set_scene_image("missing", None));
    }

    #[test]
    fn test_replace_scene_keeps_identity() {
        let mut state = storyline();
        let id = state.scenes[0].id.clone();
        let replacement = Scene::from_payload(9, ScenePayload {
            title: Some("Rewritten".into()),
            ..Default::default()
        });
        assert!(state.replace_scene(&id, replacement));
        assert_eq!(state.scenes[0].id, id);
        assert_eq!(state.scenes[0].index, 1);
        assert_eq!(state.scenes[0].title, "Rewritten");
    }

    #[test]
    fn test_storyline_reset() {
        let mut state = storyline();
        state.set_error(Some("x".into()));
        state.reset();
        assert_eq!(state, StorylineState::default());
    }
}
