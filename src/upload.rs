use std::path::Path;

use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Hard cap per uploaded file.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Write an uploaded file into `dir` under a randomized name and return the
/// stored filename. The random name avoids collisions between concurrent
/// uploads with the same client-side filename.
pub async fn save_upload(
    dir: &str,
    original_name: Option<&str>,
    bytes: &[u8],
) -> AppResult<String> {
    if bytes.is_empty() {
        return Err(AppError::Upload("file kosong".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Upload("ukuran file maksimal 5MB".to_string()));
    }

    let mut filename = Uuid::new_v4().simple().to_string();
    if let Some(ext) = original_name.and_then(extension) {
        filename.push('.');
        filename.push_str(&ext);
    }

    fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?;
    let path = Path::new(dir).join(&filename);
    fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?;

    Ok(filename)
}

fn extension(name: &str) -> Option<String> {
    let ext = name.rsplit('.').next()?;
    if ext.is_empty() || ext.len() > 8 || ext == name {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Normalize a stored image path to its public URL form. Older rows store a
/// bare filename, some store `uploads/<name>`, newer ones `/uploads/<name>`;
/// all must project identically.
pub fn public_path(stored: &str) -> String {
    let name = stored.trim_start_matches('/');
    let name = name.strip_prefix("uploads/").unwrap_or(name);
    format!("/uploads/{name}")
}
