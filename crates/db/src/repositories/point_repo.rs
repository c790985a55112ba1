//! Repository for the `points` and `point_items` tables.
//!
//! Registration writes a point and its item associations in one
//! transaction; discovery and retrieval are plain reads against the pool.

use std::collections::BTreeSet;

use ecopoint_core::discovery::PointFilter;
use ecopoint_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::point::{CreatePoint, Point, PointDetail, PointItemTitle};

/// Column list for the `points` table.
const COLUMNS: &str = "id, image, name, email, whatsapp, latitude, longitude, city, state";

/// Column list for the `points` table aliased as `p` (used in JOIN queries).
const POINT_COLUMNS: &str =
    "p.id, p.image, p.name, p.email, p.whatsapp, p.latitude, p.longitude, p.city, p.state";

/// Provides registration, discovery and retrieval of collection points.
pub struct PointRepo;

impl PointRepo {
    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register a point and its accepted items atomically.
    ///
    /// The point row and every `point_items` row are written in a single
    /// transaction. If any item id does not exist the foreign key rejects
    /// the batch, the transaction is dropped without commit, and neither the
    /// point nor any association becomes visible.
    pub async fn register(
        pool: &PgPool,
        input: CreatePoint,
        item_ids: &BTreeSet<DbId>,
    ) -> Result<Point, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let point_id = Self::insert(&mut tx, &input).await?;
        Self::insert_items(&mut tx, point_id, item_ids).await?;

        tx.commit().await?;

        tracing::debug!(point_id, item_count = item_ids.len(), "Point registered");
        Ok(input.into_point(point_id))
    }

    /// Insert one point row within an open transaction, returning its id.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreatePoint,
    ) -> Result<DbId, sqlx::Error> {
        let details = &input.details;
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO points \
                (image, name, email, whatsapp, latitude, longitude, city, state) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id",
        )
        .bind(&input.image)
        .bind(&details.name)
        .bind(&details.email)
        .bind(&details.whatsapp)
        .bind(details.latitude)
        .bind(details.longitude)
        .bind(&details.city)
        .bind(&details.state)
        .fetch_one(&mut **tx)
        .await
    }

    /// Bulk-insert one association row per item id within an open transaction.
    ///
    /// Uses a single `UNNEST` statement, so a missing item id fails the whole
    /// batch with a foreign-key violation.
    pub async fn insert_items(
        tx: &mut Transaction<'_, Postgres>,
        point_id: DbId,
        item_ids: &BTreeSet<DbId>,
    ) -> Result<(), sqlx::Error> {
        if item_ids.is_empty() {
            return Ok(());
        }

        let ids: Vec<DbId> = item_ids.iter().copied().collect();
        sqlx::query(
            "INSERT INTO point_items (point_id, item_id) \
             SELECT $1, item_id FROM UNNEST($2::bigint[]) AS item_id",
        )
        .bind(point_id)
        .bind(&ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Retrieval
    // -----------------------------------------------------------------------

    /// Find a point by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Point>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM points WHERE id = $1");
        sqlx::query_as::<_, Point>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Titles of the items a point accepts. Empty if it has none.
    pub async fn item_titles(
        pool: &PgPool,
        point_id: DbId,
    ) -> Result<Vec<PointItemTitle>, sqlx::Error> {
        sqlx::query_as::<_, PointItemTitle>(
            "SELECT i.title \
             FROM items i \
             JOIN point_items pi ON pi.item_id = i.id \
             WHERE pi.point_id = $1 \
             ORDER BY i.id",
        )
        .bind(point_id)
        .fetch_all(pool)
        .await
    }

    /// Find a point by ID, enriched with the titles of its accepted items.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<PointDetail>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(point) => {
                let items = Self::item_titles(pool, point.id).await?;
                Ok(Some(PointDetail { point, items }))
            }
            None => Ok(None),
        }
    }

    // -----------------------------------------------------------------------
    // Discovery
    // -----------------------------------------------------------------------

    /// Points in exactly `filter.city` / `filter.state` that accept at least
    /// one of `filter.item_ids`.
    ///
    /// A point accepting several of the requested items is returned once.
    /// Callers must not rely on the order of the result.
    pub async fn discover(pool: &PgPool, filter: &PointFilter) -> Result<Vec<Point>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT {POINT_COLUMNS} \
             FROM points p \
             JOIN point_items pi ON pi.point_id = p.id \
             WHERE pi.item_id = ANY($1) \
               AND p.city = $2 \
               AND p.state = $3 \
             ORDER BY p.id"
        );
        sqlx::query_as::<_, Point>(&query)
            .bind(filter.item_id_vec())
            .bind(&filter.city)
            .bind(&filter.state)
            .fetch_all(pool)
            .await
    }
}
