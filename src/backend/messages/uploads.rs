/**
 * Image Upload Handling
 *
 * Multipart parsing, validation and storage for message image
 * attachments. Files land in the configured upload directory under
 * fresh UUID names and are served back at `/uploads/<name>`; the
 * original client file name is never used on disk.
 *
 * # Limits
 *
 * - At most 5 images per message
 * - At most 5 MB per image
 * - JPEG, PNG, GIF, WebP and SVG only
 */
use axum::extract::Multipart;
use bytes::Bytes;
use std::path::Path;
use uuid::Uuid;

use crate::backend::error::ApiError;

/// Maximum number of images per message
pub const MAX_IMAGES: usize = 5;

/// Maximum size of a single image in bytes
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image content types
pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

/// An image attachment parsed out of a multipart body
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Bytes,
}

/// Validate a single image part against the type and size limits
pub fn validate_image_part(content_type: &str, size: usize) -> Result<(), ApiError> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(ApiError::validation(format!(
            "unsupported image type: {}",
            if content_type.is_empty() { "unknown" } else { content_type }
        )));
    }

    if size > MAX_IMAGE_BYTES {
        return Err(ApiError::validation("image exceeds the 5MB limit"));
    }

    Ok(())
}

/// Parse a multipart body into optional text content and validated images
///
/// The `content` field carries the message text; every other field is
/// treated as an image attachment.
pub async fn collect_multipart(
    multipart: &mut Multipart,
) -> Result<(Option<String>, Vec<UploadedImage>), ApiError> {
    let mut content = None;
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Malformed multipart body: {}", e);
        ApiError::validation("malformed multipart body")
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "content" {
            let text = field.text().await.map_err(|e| {
                tracing::warn!("Unreadable content field: {}", e);
                ApiError::validation("malformed multipart body")
            })?;
            content = Some(text);
            continue;
        }

        if images.len() >= MAX_IMAGES {
            return Err(ApiError::validation(
                "a message can attach at most 5 images",
            ));
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        let file_name = field.file_name().map(|s| s.to_string());
        let data = field.bytes().await.map_err(|e| {
            tracing::warn!("Unreadable image field {}: {}", name, e);
            ApiError::validation("malformed multipart body")
        })?;

        validate_image_part(&content_type, data.len())?;

        images.push(UploadedImage {
            file_name,
            content_type,
            data,
        });
    }

    Ok((content, images))
}

/// Write validated images to disk and return their public URLs
///
/// If any write fails, files already written in this call are removed
/// again so a failed request leaves nothing behind.
pub async fn store_images(
    upload_dir: &str,
    images: &[UploadedImage],
) -> Result<Vec<String>, ApiError> {
    tokio::fs::create_dir_all(upload_dir).await.map_err(|e| {
        tracing::error!("Failed to create upload directory {}: {}", upload_dir, e);
        ApiError::persistence("failed to store image")
    })?;

    let mut stored = Vec::with_capacity(images.len());
    for image in images {
        let name = format!("{}.{}", Uuid::new_v4(), extension_for(&image.content_type));
        let path = Path::new(upload_dir).join(&name);

        if let Err(e) = tokio::fs::write(&path, &image.data).await {
            tracing::error!("Failed to write image {}: {}", path.display(), e);
            delete_image_files(upload_dir, &stored).await;
            return Err(ApiError::persistence("failed to store image"));
        }

        stored.push(format!("/uploads/{}", name));
    }

    Ok(stored)
}

/// Best-effort removal of stored image files
///
/// URLs that do not point into `/uploads/` are skipped; they belong to
/// an external host. Files already gone are not an error. Anything
/// else is logged and skipped, since the caller has already committed
/// the operation the files belonged to.
pub async fn delete_image_files(upload_dir: &str, urls: &[String]) {
    for url in urls {
        let Some(name) = url.strip_prefix("/uploads/") else {
            continue;
        };

        // Uploaded names are flat UUIDs; anything with path structure
        // did not come from store_images
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            tracing::warn!("Refusing to delete suspicious image path: {}", url);
            continue;
        }

        let path = Path::new(upload_dir).join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to delete image {}: {}", path.display(), e),
        }
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}
