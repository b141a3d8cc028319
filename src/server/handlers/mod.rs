//! HTTP handlers for the server.

pub mod export;
pub mod generate;
pub mod hero;
pub mod storyline;
pub mod upload;

use axum::{Json, extract::rejection::JsonRejection};

use crate::error::HeroError;

/// Unwrap a JSON body, turning a rejection into a 400 with `{error}`.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HeroError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| HeroError::InvalidInput(e.body_text()))
}

/// True when the request declares a multipart body.
pub(crate) fn is_multipart(headers: &axum::http::HeaderMap) -> bool {
    headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}
