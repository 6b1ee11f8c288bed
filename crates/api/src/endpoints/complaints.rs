//! Citizen complaint endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use echocity_common::AppResult;
use echocity_core::CreateComplaintInput;
use echocity_db::entities::complaint;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Complaint response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub category_id: String,
    pub department_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub image_urls: Vec<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub resolved_at: Option<String>,
}

impl From<complaint::Model> for ComplaintResponse {
    fn from(complaint: complaint::Model) -> Self {
        let image_urls = complaint
            .image_urls
            .as_array()
            .map(|urls| {
                urls.iter()
                    .filter_map(|u| u.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: complaint.id,
            user_id: complaint.user_id,
            title: complaint.title,
            description: complaint.description,
            status: complaint.status.as_str().to_string(),
            priority: complaint.priority.as_str().to_string(),
            category_id: complaint.category_id,
            department_id: complaint.department_id,
            latitude: complaint.latitude,
            longitude: complaint.longitude,
            address: complaint.address,
            image_urls,
            created_at: complaint.created_at.to_rfc3339(),
            updated_at: complaint.updated_at.map(|t| t.to_rfc3339()),
            resolved_at: complaint.resolved_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Pagination query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// File a new complaint.
async fn create_complaint(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateComplaintInput>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let complaint = state.complaint_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(complaint.into()))
}

/// List the signed-in user's complaints.
async fn list_my_complaints(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<ComplaintResponse>>> {
    let complaints = state
        .complaint_service
        .list_for_user(&user.id, query.limit.min(100), query.offset)
        .await?;

    Ok(ApiResponse::ok(
        complaints.into_iter().map(Into::into).collect(),
    ))
}

/// Get a single complaint (owner or admin only).
async fn get_complaint(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let access = state.role_resolver.resolve(&user.id).await;
    let complaint = state
        .complaint_service
        .get_for_viewer(&id, &user.id, access.is_admin)
        .await?;

    Ok(ApiResponse::ok(complaint.into()))
}

/// Dispute a resolved complaint as its owner.
async fn dispute_complaint(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let complaint = state.complaint_service.dispute(&id, &user.id).await?;
    Ok(ApiResponse::ok(complaint.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_complaint).get(list_my_complaints))
        .route("/{id}", get(get_complaint))
        .route("/{id}/dispute", post(dispute_complaint))
}
