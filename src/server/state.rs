//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use crate::assets::ImageAcquirer;
use crate::brand;
use crate::compose::preview::PreviewCompositor;
use crate::error::HeroError;
use crate::generate::{ProviderKeys, Providers};
use crate::layout::CanvasSpec;
use crate::store::{HeroState, StorylineState};
use crate::typeface::{self, Typeface};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Origin that site-relative asset paths such as `/logo/Logo-dark.png` resolve against
    pub public_base_url: Option<String>,
    /// Regular TrueType face; the built-in bitmap face is used when unset
    pub font_path: Option<PathBuf>,
    pub bold_font_path: Option<PathBuf>,
    /// Timeout for asset downloads and provider calls
    pub fetch_timeout_secs: u64,
    /// Edge of the live preview surface
    pub preview_px: u32,
    pub providers: ProviderKeys,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            public_base_url: None,
            font_path: None,
            bold_font_path: None,
            fetch_timeout_secs: 30,
            preview_px: brand::PREVIEW_PX,
            providers: ProviderKeys::default(),
        }
    }
}

impl ServerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub acquirer: ImageAcquirer,
    pub face: Arc<dyn Typeface>,
    pub providers: Providers,
    pub hero: RwLock<HeroState>,
    pub storyline: RwLock<StorylineState>,
    pub preview: Arc<Mutex<PreviewCompositor>>,
}

impl AppState {
    /// Load fonts and build clients from `config`.
    pub fn new(config: ServerConfig) -> Result<Self, HeroError> {
        let face = typeface::load(config.font_path.as_deref(), config.bold_font_path.as_deref())?;
        let acquirer = ImageAcquirer::new(config.fetch_timeout(), config.public_base_url.clone())?;
        // provider calls get four times the fetch budget
        let providers = Providers::from_keys(&config.providers, config.fetch_timeout() * 4)?;
        Ok(Self::from_parts(config, acquirer, face, providers))
    }

    pub fn from_parts(
        config: ServerConfig,
        acquirer: ImageAcquirer,
        face: Arc<dyn Typeface>,
        providers: Providers,
    ) -> Self {
        let preview = PreviewCompositor::new(config.preview_px, face.clone());
        Self {
            config,
            acquirer,
            face,
            providers,
            hero: RwLock::new(HeroState::default()),
            storyline: RwLock::new(StorylineState::default()),
            preview: Arc::new(Mutex::new(preview)),
        }
    }

    pub fn export_canvas(&self) -> CanvasSpec {
        CanvasSpec::export()
    }
}
