//! Department endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use echocity_common::AppResult;
use echocity_core::{CreateDepartmentInput, UpdateDepartmentInput};
use echocity_db::entities::department;
use serde::Serialize;

use crate::{
    endpoints::categories::CategoryResponse, extractors::AuthUser, middleware::AppState,
    response::ApiResponse,
};

/// Department response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<department::Model> for DepartmentResponse {
    fn from(department: department::Model) -> Self {
        Self {
            id: department.id,
            name: department.name,
            description: department.description,
        }
    }
}

/// List all departments.
async fn list_departments(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<DepartmentResponse>>> {
    let departments = state.department_service.list().await?;
    Ok(ApiResponse::ok(
        departments.into_iter().map(Into::into).collect(),
    ))
}

/// Get a department by ID.
async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DepartmentResponse>> {
    let department = state.department_service.get(&id).await?;
    Ok(ApiResponse::ok(department.into()))
}

/// List categories handled by a department.
async fn list_department_categories(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let categories = state.category_service.list_for_department(&id).await?;
    Ok(ApiResponse::ok(
        categories.into_iter().map(Into::into).collect(),
    ))
}

/// Create a department (admin only).
async fn create_department(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDepartmentInput>,
) -> AppResult<ApiResponse<DepartmentResponse>> {
    state.role_resolver.require_admin(&user.id).await?;

    let department = state.department_service.create(input).await?;
    Ok(ApiResponse::ok(department.into()))
}

/// Update a department (admin only).
async fn update_department(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateDepartmentInput>,
) -> AppResult<ApiResponse<DepartmentResponse>> {
    state.role_resolver.require_admin(&user.id).await?;

    let department = state.department_service.update(&id, input).await?;
    Ok(ApiResponse::ok(department.into()))
}

/// Delete a department (admin only).
async fn delete_department(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.role_resolver.require_admin(&user.id).await?;

    state.department_service.delete(&id).await?;
    Ok(crate::response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route(
            "/{id}",
            get(get_department)
                .patch(update_department)
                .delete(delete_department),
        )
        .route("/{id}/categories", get(list_department_categories))
}
