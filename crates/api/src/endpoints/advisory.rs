//! AI advisory endpoints.
//!
//! Suggestions only: responses carry an `autoApplyCategoryId` when the
//! confidence/match gate passes, and the client decides whether to use it.

use axum::{Json, Router, extract::State, routing::post};
use base64::Engine;
use echocity_common::{AppError, AppResult};
use echocity_core::{CategorySuggestion, ImageAnalysis, UrlAnalysis, select_category};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Categorize request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizeRequest {
    pub text: String,
}

/// Categorize response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizeResponse {
    pub suggestion: Option<CategorySuggestion>,
    /// Set only when the suggestion clears the auto-apply gate.
    pub auto_apply_category_id: Option<String>,
}

/// Suggest a category for complaint text.
async fn categorize(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CategorizeRequest>,
) -> AppResult<ApiResponse<CategorizeResponse>> {
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest("Text must not be empty".to_string()));
    }

    let categories = state.category_service.list().await?;
    let names: Vec<String> = categories.iter().map(|c| c.name.clone()).collect();

    let suggestion = state.advisory_service.suggest_category(&req.text, &names).await;
    let auto_apply_category_id = suggestion
        .as_ref()
        .and_then(|s| select_category(s, &categories))
        .map(|c| c.id.clone());

    Ok(ApiResponse::ok(CategorizeResponse {
        suggestion,
        auto_apply_category_id,
    }))
}

/// Image analysis request (inline base64 payload).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageRequest {
    pub image_base64: String,
    pub mime_type: String,
}

/// Analyze an uploaded photo and suggest complaint fields.
async fn analyze_image(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AnalyzeImageRequest>,
) -> AppResult<ApiResponse<Option<ImageAnalysis>>> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&req.image_base64)
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 payload: {e}")))?;

    let analysis = state.advisory_service.analyze_image(&bytes, &req.mime_type).await;
    Ok(ApiResponse::ok(analysis))
}

/// URL analysis request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeUrlRequest {
    pub image_url: String,
}

/// Ask the local analysis webhook about an uploaded image URL.
async fn analyze_url(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AnalyzeUrlRequest>,
) -> AppResult<ApiResponse<Option<UrlAnalysis>>> {
    let analysis = state.advisory_service.analyze_by_url(&req.image_url).await;
    Ok(ApiResponse::ok(analysis))
}

/// Description enhancement request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    pub text: String,
}

/// Description enhancement response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub text: String,
}

/// Rewrite a complaint description for clarity.
async fn enhance(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<EnhanceRequest>,
) -> AppResult<ApiResponse<EnhanceResponse>> {
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest("Text must not be empty".to_string()));
    }

    let text = state.advisory_service.enhance_description(&req.text).await;
    Ok(ApiResponse::ok(EnhanceResponse { text }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categorize", post(categorize))
        .route("/analyze-image", post(analyze_image))
        .route("/analyze-url", post(analyze_url))
        .route("/enhance", post(enhance))
}
