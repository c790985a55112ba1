//! Route definitions for collection points.

use axum::routing::get;
use axum::Router;

use crate::handlers::point;
use crate::state::AppState;

/// Routes mounted at `/points`.
///
/// ```text
/// GET  /       -> list (discovery)
/// POST /       -> create (registration)
/// GET  /{id}   -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(point::list).post(point::create))
        .route("/{id}", get(point::get_by_id))
}
