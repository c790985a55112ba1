//! Naming rules for uploaded point images.
//!
//! The file bytes themselves are handled by the storage collaborator in the
//! API crate; this module only decides whether an upload is acceptable and
//! what unique filename it is stored under.

use crate::error::CoreError;

/// Image extensions accepted for point photos (lowercase, without dot).
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Number of random bytes in the filename prefix (rendered as hex).
pub const RANDOM_PREFIX_BYTES: usize = 6;

/// Extract and validate the lowercase extension of an uploaded filename.
pub fn validate_image_extension(original_name: &str) -> Result<String, CoreError> {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported image format '.{ext}'. Supported: {}",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        )))
    }
}

/// Reduce a client-supplied filename to a safe basename.
///
/// Directory components are dropped and every character outside
/// `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_filename(original_name: &str) -> String {
    let base = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(original_name);

    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

/// Build a unique stored filename: `{hex prefix}-{sanitized original name}`.
pub fn unique_image_filename(original_name: &str) -> Result<String, CoreError> {
    validate_image_extension(original_name)?;

    let prefix: [u8; RANDOM_PREFIX_BYTES] = rand::random();
    let hex: String = prefix.iter().map(|b| format!("{b:02x}")).collect();

    Ok(format!("{hex}-{}", sanitize_filename(original_name)))
}
