//! Evidence upload service.
//!
//! Accepts complaint photos, enforces type and size limits, and hands
//! the bytes to the configured storage backend.

use std::sync::Arc;

use echocity_common::{AppError, AppResult, StorageBackend, generate_storage_key};
use serde::Serialize;
use tracing::info;

/// Maximum upload size (10 MiB).
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// A stored complaint photo.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedImage {
    /// Public URL of the stored image.
    pub url: String,
    /// Storage key.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
}

/// Upload service.
#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn StorageBackend>,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Store a complaint photo for a user.
    pub async fn store_image(
        &self,
        user_id: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> AppResult<UploadedImage> {
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest(format!(
                "Only image uploads are accepted, got {content_type}"
            )));
        }

        if data.is_empty() {
            return Err(AppError::BadRequest("Empty upload".to_string()));
        }

        if data.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest(format!(
                "Image too large: {} bytes (limit {MAX_IMAGE_BYTES})",
                data.len()
            )));
        }

        let key = generate_storage_key(user_id, file_name);
        let stored = self.storage.upload(&key, data, content_type).await?;

        info!(user_id = %user_id, key = %stored.key, size = stored.size, "Image stored");

        Ok(UploadedImage {
            url: stored.url,
            key: stored.key,
            size: stored.size,
            content_type: stored.content_type,
        })
    }
}
