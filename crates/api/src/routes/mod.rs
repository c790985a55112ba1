pub mod health;
pub mod item;
pub mod point;

use axum::Router;

use crate::state::AppState;

/// Build the registry route tree.
///
/// Route hierarchy:
///
/// ```text
/// /items                 list material catalog
///
/// /points                discover (GET), register (POST, multipart)
/// /points/{id}           get point with item titles
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/items", item::router())
        .nest("/points", point::router())
}
