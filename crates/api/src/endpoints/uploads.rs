//! Evidence upload endpoints.

use axum::{Router, extract::Multipart, extract::State, routing::post};
use echocity_common::{AppError, AppResult};
use echocity_core::UploadedImage;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Upload response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub files: Vec<UploadedFileResponse>,
}

/// A single stored file.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileResponse {
    pub url: String,
    pub key: String,
    pub size: u64,
    pub content_type: String,
}

impl From<UploadedImage> for UploadedFileResponse {
    fn from(image: UploadedImage) -> Self {
        Self {
            url: image.url,
            key: image.key,
            size: image.size,
            content_type: image.content_type,
        }
    }
}

/// Upload one or more complaint photos (multipart form).
async fn upload_images(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<UploadResponse>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        let stored = state
            .upload_service
            .store_image(&user.id, &file_name, &content_type, &data)
            .await?;

        files.push(stored.into());
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("No files in upload".to_string()));
    }

    Ok(ApiResponse::ok(UploadResponse { files }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload_images))
}
