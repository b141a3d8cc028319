//! # HTTP Server for Hero Visuals and Storylines
//!
//! Exposes export, live preview, editor state, upload, generation and
//! storyline endpoints.
//!
//! ## Usage
//!
//! ```bash
//! hero-studio serve --listen 0.0.0.0:8080 --public-base-url https://brand.example.com
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/api/export` | 1080x1080 PNG download |
//! | POST | `/api/layout` | Geometry-only layout descriptor |
//! | GET/PUT | `/api/hero/state` | Read or patch editor state |
//! | POST | `/api/hero/reset` | Restore defaults |
//! | POST/DELETE | `/api/hero/media` | Media library |
//! | POST | `/api/hero/logo` | Select a logo with editor placement |
//! | GET | `/api/hero/preview` | Live preview PNG |
//! | GET | `/api/hero/preview/layout` | Live preview geometry |
//! | POST | `/api/upload` | Image upload to data URI |
//! | POST | `/api/generate-image` | Background or scene frame |
//! | POST | `/api/generate-text` | Title / description copy |
//! | GET | `/api/presets` | Prompt presets and bundled logos |
//! | GET | `/api/check-env` | Configured provider keys |
//! | POST | `/api/storyline/generate` | Storyline from script, blocks or recording |
//! | POST | `/api/storyline/regenerate-scene` | Rewrite one scene |
//! | GET | `/api/storyline/state` | Storyline state |
//! | POST | `/api/storyline/reset` | Clear storyline |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::HeroError;
use crate::storyline::MAX_VIDEO_BYTES;

/// Body limit for upload routes; leaves room for multipart framing.
const UPLOAD_BODY_LIMIT: usize = MAX_VIDEO_BYTES + 1024 * 1024;

/// Build the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Export
        .route("/api/export", post(handlers::export::export))
        .route("/api/layout", post(handlers::export::layout))
        // Hero builder
        .route(
            "/api/hero/state",
            get(handlers::hero::get_state).put(handlers::hero::put_state),
        )
        .route("/api/hero/reset", post(handlers::hero::reset))
        .route(
            "/api/hero/media",
            post(handlers::hero::add_media).delete(handlers::hero::remove_media),
        )
        .route("/api/hero/logo", post(handlers::hero::select_logo))
        .route("/api/hero/preview", get(handlers::hero::preview))
        .route("/api/hero/preview/layout", get(handlers::hero::preview_layout))
        // Upload (50MB limit)
        .route(
            "/api/upload",
            post(handlers::upload::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // Generation
        .route("/api/generate-image", post(handlers::generate::generate_image))
        .route("/api/generate-text", post(handlers::generate::generate_text))
        .route("/api/presets", get(handlers::generate::presets))
        .route("/api/check-env", get(handlers::generate::check_env))
        // Storyline (recordings up to 50MB)
        .route(
            "/api/storyline/generate",
            post(handlers::storyline::generate).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/storyline/regenerate-scene",
            post(handlers::storyline::regenerate_scene),
        )
        .route("/api/storyline/state", get(handlers::storyline::get_state))
        .route("/api/storyline/reset", post(handlers::storyline::reset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use hero_studio::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), hero_studio::HeroError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     ..ServerConfig::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), HeroError> {
    let listen_addr = config.listen_addr.clone();
    let app_state = Arc::new(AppState::new(config)?);
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(addr = %listen_addr, "hero-studio server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
