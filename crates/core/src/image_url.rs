//! Public URL composition for stored images.
//!
//! The database stores bare filenames. Seed catalog images are served under
//! `/uploads` and uploaded point photos under `/images`.

/// Path prefix for seed item images.
pub const ITEM_IMAGE_PATH: &str = "uploads";

/// Path prefix for uploaded point images.
pub const POINT_IMAGE_PATH: &str = "images";

/// Join a base URL, a path segment, and a filename without doubling slashes.
pub fn public_image_url(base_url: &str, path: &str, filename: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_matches('/'),
        filename.trim_start_matches('/')
    )
}

/// URL of a catalog item's image.
pub fn item_image_url(base_url: &str, filename: &str) -> String {
    public_image_url(base_url, ITEM_IMAGE_PATH, filename)
}

/// URL of a point's uploaded image.
pub fn point_image_url(base_url: &str, filename: &str) -> String {
    public_image_url(base_url, POINT_IMAGE_PATH, filename)
}
