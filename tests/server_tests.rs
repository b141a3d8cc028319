//! # Server Tests
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot`. No provider
//! keys are configured, so generation exercises the offline fallbacks.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use hero_studio::assets::{ImageAcquirer, to_data_uri};
use hero_studio::generate::{ProviderKeys, Providers};
use hero_studio::server::{AppState, ServerConfig, router};
use hero_studio::typeface::BitmapFace;
use image::{ImageFormat, Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app() -> Router {
    let config = ServerConfig::default();
    let acquirer = ImageAcquirer::new(Duration::from_secs(2), None).unwrap();
    let providers = Providers::from_keys(&ProviderKeys::default(), Duration::from_secs(2)).unwrap();
    router(Arc::new(AppState::from_parts(config, acquirer, Arc::new(BitmapFace), providers)))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn png(w: u32, h: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(w, h, Rgba([40, 80, 120, 255]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[tokio::test]
async fn export_returns_png_attachment() {
    let response = app()
        .oneshot(json_request("POST", "/api/export", json!({"title": "Hello World", "description": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=hero-visual.png"
    );
    let decoded = image::load_from_memory(&body_bytes(response).await).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1080, 1080));
}

#[tokio::test]
async fn export_rejects_blob_background() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/export",
            json!({"backgroundUrl": "blob:http://localhost:3000/abc", "title": "T"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("Background"));
    assert!(error.contains("Generate a new background"));
}

#[tokio::test]
async fn export_rejects_malformed_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/export")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await.get("error").is_some());
}

#[tokio::test]
async fn layout_describes_logo_geometry() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/layout",
            json!({
                "logoPosition": "top-right",
                "logoScale": 1.5,
                "logoPadding": 52,
                "logoWidth": 400,
                "logoHeight": 100,
                "title": "Hello World"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let layout = body_json(response).await;
    assert_eq!(layout["canvasPx"], 1080);
    assert_eq!(layout["logo"]["w"], 300.0);
    assert_eq!(layout["logo"]["x"], 728.0);
    assert_eq!(layout["title"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn layout_rejects_unknown_block_flow() {
    let response = app()
        .oneshot(json_request("POST", "/api/layout", json!({"blockFlow": "diagonal"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hero_state_patch_and_reset() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/hero/state",
            json!({"title": "Launch Day", "logoScale": 5, "logoPosition": "top-left"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let patched = body_json(response).await;
    assert_eq!(patched["title"], "Launch Day");
    assert_eq!(patched["logoScale"], 2.0);
    assert_eq!(patched["logoPosition"], "top-left");

    let state = body_json(app.clone().oneshot(get("/api/hero/state")).await.unwrap()).await;
    assert_eq!(state["title"], "Launch Day");

    let reset = body_json(
        app.clone()
            .oneshot(json_request("POST", "/api/hero/reset", json!({})))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(reset["title"], "");
    assert_eq!(reset["logoPosition"], "bottom-right");
}

#[tokio::test]
async fn selecting_a_logo_applies_editor_placement() {
    let response = app()
        .oneshot(json_request("POST", "/api/hero/logo", json!({"url": "/logo/Logo-light.png"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let state = body_json(response).await;
    assert_eq!(state["logoUrl"], "/logo/Logo-light.png");
    assert_eq!(state["logoPosition"], "top-left");
    assert_eq!(state["logoScale"], 1.5);
    assert_eq!(state["logoPadding"], 52.0);
    assert_eq!(state["mediaLibrary"], json!(["/logo/Logo-light.png"]));
}

#[tokio::test]
async fn preview_renders_current_state() {
    let app = app();
    let logo = to_data_uri("image/png", &png(400, 100));
    app.clone()
        .oneshot(json_request(
            "PUT",
            "/api/hero/state",
            json!({"title": "Preview", "logoUrl": logo}),
        ))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/api/hero/preview")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let decoded = image::load_from_memory(&body_bytes(response).await).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (400, 400));

    let layout = body_json(app.oneshot(get("/api/hero/preview/layout")).await.unwrap()).await;
    let w = layout["logo"]["w"].as_f64().unwrap();
    assert!((w - 200.0 * 400.0 / 1080.0).abs() < 1e-3);
}

#[tokio::test]
async fn preview_ignores_unreachable_assets() {
    let app = app();
    app.clone()
        .oneshot(json_request(
            "PUT",
            "/api/hero/state",
            json!({"selectedBackgroundUrl": "blob:http://localhost/gone"}),
        ))
        .await
        .unwrap();
    let response = app.oneshot(get("/api/hero/preview")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn upload_json_and_multipart() {
    let app = app();
    let uri = to_data_uri("image/png", &png(2, 2));

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/upload", json!({"image": uri})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["url"], uri.as_str());

    let boundary = "hero-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"logo.png\"\r\nContent-Type: image/png\r\n\r\n",
            b = boundary
        )
        .as_bytes(),
    );
    body.extend_from_slice(&png(2, 2));
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["url"], uri.as_str());

    let state = body_json(app.oneshot(get("/api/hero/state")).await.unwrap()).await;
    assert_eq!(state["mediaLibrary"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn upload_requires_image() {
    let response = app()
        .oneshot(json_request("POST", "/api/upload", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_text_falls_back_without_providers() {
    let response = app()
        .oneshot(json_request("POST", "/api/generate-text", json!({"context": "", "type": "both"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let copy = body_json(response).await;
    assert_eq!(copy["title"], "Your Brand Story");
    assert_eq!(
        copy["description"],
        "Discover how we help businesses grow with innovative solutions."
    );
}

#[tokio::test]
async fn generate_image_uses_placeholder_and_selects_it() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/generate-image", json!({"prompt": "cloud servers"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let output = body_json(response).await;
    assert_eq!(output["engine"], "placeholder");
    let url = output["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("https://picsum.photos/seed/"));

    let state = body_json(app.oneshot(get("/api/hero/state")).await.unwrap()).await;
    assert_eq!(state["selectedBackgroundUrl"], url.as_str());
    assert_eq!(state["generatedImages"][0]["prompt"], "cloud servers");
    assert_eq!(state["isGenerating"], false);
}

#[tokio::test]
async fn generate_image_requires_prompt() {
    let response = app()
        .oneshot(json_request("POST", "/api/generate-image", json!({"prompt": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn storyline_without_provider_is_unavailable() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/storyline/generate",
            json!({"inputType": "voiceover", "voiceoverScript": "Exports used to take hours."}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("ANTHROPIC_API_KEY"));

    let state = body_json(app.oneshot(get("/api/storyline/state")).await.unwrap()).await;
    assert_eq!(state["inputType"], "voiceover");
    assert_eq!(state["isGenerating"], false);
    assert!(state["error"].is_string());
}

#[tokio::test]
async fn storyline_rejects_missing_input() {
    let response = app()
        .oneshot(json_request("POST", "/api/storyline/generate", json!({"inputType": "scratch"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn truncated_recording_upload_is_rejected() {
    let boundary = "hero-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"inputType\"\r\n\r\nrecor",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/storyline/generate")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(body))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn regenerate_requires_a_scene() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/storyline/regenerate-scene",
            json!({"sceneId": "missing", "comments": "shorter"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_env_reports_missing_keys() {
    let status = body_json(app().oneshot(get("/api/check-env")).await.unwrap()).await;
    assert_eq!(status["GOOGLE_AI_API_KEY"], "missing");
    assert_eq!(status["OPENAI_API_KEY"], "missing");
    assert_eq!(status["ANTHROPIC_API_KEY"], "missing");
    assert!(status["hint"].is_string());
}

#[tokio::test]
async fn presets_list_prompts_and_logos() {
    let presets = body_json(app().oneshot(get("/api/presets")).await.unwrap()).await;
    assert_eq!(presets["prompts"].as_array().unwrap().len(), 4);
    assert_eq!(presets["logos"][0]["path"], "/logo/Logo-dark.png");
}
