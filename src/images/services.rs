use anyhow::Context;
use tracing::{info, warn};
use uuid::Uuid;

use super::form::UploadItem;
use crate::error::{AppError, AppResult};
use crate::storage::StorageClient;

pub const IMAGE_RULES: &str = "Only PNG/JPG/WEBP/GIF images allowed (max ~3MB)";

/// Validates and writes one uploaded image, returning its public path
/// (e.g. `/uploads/<uuid>.png`).
pub async fn store_image(
    storage: &dyn StorageClient,
    max_bytes: usize,
    img: UploadItem,
) -> AppResult<String> {
    let Some(ext) = ext_from_mime(&img.content_type) else {
        warn!(content_type = %img.content_type, "rejected upload type");
        return Err(AppError::bad_request(IMAGE_RULES));
    };
    if img.body.len() > max_bytes {
        warn!(size = img.body.len(), max_bytes, "rejected oversized upload");
        return Err(AppError::bad_request(IMAGE_RULES));
    }

    let key = format!("{}.{}", Uuid::new_v4(), ext);
    storage
        .put_object(&key, img.body, &img.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    info!(%key, original = ?img.file_name, "image stored");
    Ok(storage.public_url(&key))
}

/// Best-effort removal of a previously stored image; failures are only logged.
pub async fn discard_image(storage: &dyn StorageClient, url: Option<&str>) {
    let Some(key) = url.and_then(|u| storage.key_for_url(u)) else {
        return;
    };
    if let Err(e) = storage.delete_object(&key).await {
        warn!(error = %e, %key, "failed to remove stale image");
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}
