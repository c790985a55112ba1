//! Handlers for the `/items` resource (material catalog).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use ecopoint_core::image_url::item_image_url;
use ecopoint_core::types::DbId;
use ecopoint_db::repositories::ItemRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Catalog entry as returned to clients, with a resolved image URL.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: DbId,
    pub title: String,
    pub image_url: String,
}

/// GET /items
///
/// List every material category in the catalog.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let base_url = &state.config.public_base_url;
    let items: Vec<ItemResponse> = ItemRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|item| ItemResponse {
            image_url: item_image_url(base_url, &item.image),
            id: item.id,
            title: item.title,
        })
        .collect();

    Ok(Json(DataResponse { data: items }))
}
