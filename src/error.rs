//! # Error Types
//!
//! This module defines error types used throughout the hero-studio library.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::assets::AssetSlot;

/// Main error type for hero-studio operations
#[derive(Debug, Error)]
pub enum HeroError {
    /// Malformed request shape or out-of-range parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Background or logo could not be fetched, decoded, or is an
    /// unresolvable ephemeral reference
    #[error("{message}")]
    AssetUnavailable { asset: AssetSlot, message: String },

    /// Unexpected failure while drawing or encoding
    #[error("Composition failed: {0}")]
    CompositionFailed(String),

    /// A generation provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// No provider is configured for the requested capability
    #[error("{0}")]
    NoProvider(String),

    /// Font file could not be loaded
    #[error("Font error: {0}")]
    Font(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HeroError {
    /// The asset is a browser-local handle that cannot be dereferenced here.
    pub fn asset_ephemeral(asset: AssetSlot) -> Self {
        let message = match asset {
            AssetSlot::Background => {
                "Background image is not available for export. Generate a new background and try again."
            }
            AssetSlot::Logo => {
                "Logo is not available for export. Re-upload the logo and try again."
            }
        };
        HeroError::AssetUnavailable {
            asset,
            message: message.to_string(),
        }
    }

    /// The asset could not be fetched or decoded.
    pub fn asset_unreadable(asset: AssetSlot, detail: impl std::fmt::Display) -> Self {
        HeroError::AssetUnavailable {
            asset,
            message: format!(
                "Could not load {} image ({}). {}",
                asset.label(),
                detail,
                asset.guidance()
            ),
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            HeroError::InvalidInput(_) | HeroError::AssetUnavailable { .. } => {
                StatusCode::BAD_REQUEST
            }
            HeroError::Provider(_) => StatusCode::BAD_GATEWAY,
            HeroError::NoProvider(_) => StatusCode::SERVICE_UNAVAILABLE,
            HeroError::CompositionFailed(_) | HeroError::Font(_) | HeroError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for HeroError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            match self {
                HeroError::CompositionFailed(_) => "Failed to export image".to_string(),
                other => other.to_string(),
            }
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
            self.to_string()
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
