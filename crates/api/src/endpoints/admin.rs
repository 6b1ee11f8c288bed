//! Admin triage endpoints.
//!
//! Every handler resolves the caller's role server-side before acting;
//! nothing here trusts a role claim from the request.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use echocity_common::{AppError, AppResult};
use echocity_core::ComplaintStats;
use echocity_db::entities::{complaint::ComplaintStatus, profile::AppRole};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::complaints::ComplaintResponse, extractors::AuthUser, middleware::AppState,
    response::ApiResponse,
};

/// List complaints request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListComplaintsQuery {
    #[serde(default)]
    pub status: Option<ComplaintStatus>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// Status change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub status: ComplaintStatus,
}

/// Role change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRoleRequest {
    pub role: String,
}

/// Role change response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRoleResponse {
    pub user_id: String,
    pub role: String,
}

/// List all complaints for triage.
async fn list_complaints(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListComplaintsQuery>,
) -> AppResult<ApiResponse<Vec<ComplaintResponse>>> {
    state.role_resolver.require_admin(&user.id).await?;

    let complaints = state
        .complaint_service
        .list_all(query.status, query.limit.min(100), query.offset)
        .await?;

    Ok(ApiResponse::ok(
        complaints.into_iter().map(Into::into).collect(),
    ))
}

/// Apply a lifecycle transition to a complaint.
async fn set_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    state.role_resolver.require_admin(&user.id).await?;

    let complaint = state
        .complaint_service
        .transition(&id, req.status, &user.id, true)
        .await?;

    Ok(ApiResponse::ok(complaint.into()))
}

/// Aggregate complaint counts for the dashboard.
async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ComplaintStats>> {
    state.role_resolver.require_admin(&user.id).await?;

    let stats = state.complaint_service.stats().await?;
    Ok(ApiResponse::ok(stats))
}

/// Grant or revoke the admin role.
async fn set_role(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<SetRoleRequest>,
) -> AppResult<ApiResponse<SetRoleResponse>> {
    state.role_resolver.require_admin(&user.id).await?;

    let role = match req.role.as_str() {
        "admin" => AppRole::Admin,
        "citizen" => AppRole::Citizen,
        other => {
            return Err(AppError::BadRequest(format!("Unknown role: {other}")));
        }
    };

    let profile = state.account_service.set_role(&user_id, role).await?;

    Ok(ApiResponse::ok(SetRoleResponse {
        user_id: profile.user_id,
        role: profile.role.as_str().to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/complaints", get(list_complaints))
        .route("/complaints/{id}/status", post(set_status))
        .route("/stats", get(stats))
        .route("/users/{user_id}/role", post(set_role))
}
