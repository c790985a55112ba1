#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use ecopoint_api::config::ServerConfig;
use ecopoint_api::router::build_app_router;
use ecopoint_api::state::AppState;
use ecopoint_api::storage::LocalImageStore;

/// Multipart boundary used by [`MultipartBuilder`].
const BOUNDARY: &str = "----ecopoint-test-boundary";

/// Base URL used when composing `image_url` in tests.
pub const TEST_BASE_URL: &str = "http://test.local:3333";

/// A test application plus the temporary directories it serves from.
///
/// The directories are removed when this is dropped, so keep it alive for
/// the whole test.
pub struct TestApp {
    pub router: Router,
    pub images_dir: TempDir,
    pub uploads_dir: TempDir,
}

impl TestApp {
    /// A fresh clone of the router (`oneshot` consumes it).
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Number of files currently stored in the images directory.
    pub fn stored_image_count(&self) -> usize {
        std::fs::read_dir(self.images_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Build a test `ServerConfig` with safe defaults pointing at `images` / `uploads`.
pub fn test_config(images_dir: &TempDir, uploads_dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        public_base_url: TEST_BASE_URL.to_string(),
        uploads_dir: uploads_dir.path().to_path_buf(),
        images_dir: images_dir.path().to_path_buf(),
        max_upload_bytes: 64 * 1024,
        db_max_connections: 5,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and fresh temporary image directories.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let images_dir = tempfile::tempdir().expect("images tempdir");
    let uploads_dir = tempfile::tempdir().expect("uploads tempdir");
    let config = test_config(&images_dir, &uploads_dir);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images: Arc::new(LocalImageStore::new(images_dir.path())),
    };

    TestApp {
        router: build_app_router(state, &config),
        images_dir,
        uploads_dir,
    }
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a multipart POST request built with [`MultipartBuilder`].
pub async fn post_multipart(app: Router, uri: &str, form: MultipartBuilder) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(form.finish()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Minimal multipart/form-data encoder for tests.
#[derive(Default)]
pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// A complete, valid registration form for the given location and items.
pub fn registration_form(name: &str, city: &str, uf: &str, items: &str) -> MultipartBuilder {
    MultipartBuilder::new()
        .text("name", name)
        .text("email", "contato@example.com")
        .text("whatsapp", "5511987654321")
        .text("latitude", "-22.9068")
        .text("longitude", "-43.1729")
        .text("city", city)
        .text("uf", uf)
        .text("items", items)
        .file("image", "point.png", b"\x89PNG\r\n\x1a\nfake")
}
