//! Repository for the `items` table (read-only material catalog).

use sqlx::PgPool;

use crate::models::item::Item;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, image";

/// Read access to the seeded material catalog.
pub struct ItemRepo;

impl ItemRepo {
    /// List every catalog item, ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items ORDER BY id");
        sqlx::query_as::<_, Item>(&query).fetch_all(pool).await
    }
}
