//! Material category model.

use ecopoint_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `items` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub title: String,
    /// Bare filename of the category icon.
    pub image: String,
}
