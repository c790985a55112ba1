//! Route definitions for the material catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::item;
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET  /       -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(item::list))
}
