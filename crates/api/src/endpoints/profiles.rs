//! Signed-in profile endpoints.

use axum::{Json, Router, extract::State, routing::get};
use echocity_common::AppResult;
use echocity_core::UpdateProfileInput;
use echocity_db::entities::profile;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: Option<String>,
    pub role: String,
    pub is_admin: bool,
}

impl ProfileResponse {
    fn from_model(profile: profile::Model, is_admin: bool) -> Self {
        Self {
            user_id: profile.user_id,
            full_name: profile.full_name,
            phone: profile.phone,
            address: profile.address,
            city: profile.city,
            state: profile.state,
            pincode: profile.pincode,
            role: profile.role.as_str().to_string(),
            is_admin,
        }
    }
}

/// Get the signed-in user's profile.
async fn get_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.account_service.get_profile(&user.id).await?;
    let access = state.role_resolver.resolve(&user.id).await;

    Ok(ApiResponse::ok(ProfileResponse::from_model(
        profile,
        access.is_admin,
    )))
}

/// Update the signed-in user's profile.
async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.account_service.update_profile(&user.id, input).await?;
    let access = state.role_resolver.resolve(&user.id).await;

    Ok(ApiResponse::ok(ProfileResponse::from_model(
        profile,
        access.is_admin,
    )))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).patch(update_profile))
}
