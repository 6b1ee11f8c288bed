//! Category endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use echocity_common::AppResult;
use echocity_core::CreateCategoryInput;
use echocity_db::entities::category;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Category response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub department_id: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(category: category::Model) -> Self {
        Self {
            id: category.id,
            name: category.name,
            icon: category.icon,
            department_id: category.department_id,
        }
    }
}

/// List all categories.
async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let categories = state.category_service.list().await?;
    Ok(ApiResponse::ok(
        categories.into_iter().map(Into::into).collect(),
    ))
}

/// Get a category by ID.
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let category = state.category_service.get(&id).await?;
    Ok(ApiResponse::ok(category.into()))
}

/// Create a category (admin only).
async fn create_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    state.role_resolver.require_admin(&user.id).await?;

    let category = state.category_service.create(input).await?;
    Ok(ApiResponse::ok(category.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/{id}", get(get_category))
}
