//! Collection point model and DTOs.
//!
//! The `state` column travels as `uf` on the wire, matching the field name
//! the registration form and discovery query use.

use ecopoint_core::registration::PointDetails;
use ecopoint_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `points` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Point {
    pub id: DbId,
    /// Server-generated filename of the uploaded photo.
    pub image: String,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    #[serde(rename = "uf")]
    pub state: String,
}

/// DTO for inserting a new point. `image` must already be stored.
#[derive(Debug, Clone)]
pub struct CreatePoint {
    pub image: String,
    pub details: PointDetails,
}

impl CreatePoint {
    /// Combine the inserted fields with the id the database assigned.
    pub fn into_point(self, id: DbId) -> Point {
        let PointDetails {
            name,
            email,
            whatsapp,
            latitude,
            longitude,
            city,
            state,
        } = self.details;

        Point {
            id,
            image: self.image,
            name,
            email,
            whatsapp,
            latitude,
            longitude,
            city,
            state,
        }
    }
}

/// Title of an item accepted by a point (join projection).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct PointItemTitle {
    pub title: String,
}

/// A point together with the titles of the items it accepts.
#[derive(Debug, Clone, Serialize)]
pub struct PointDetail {
    pub point: Point,
    pub items: Vec<PointItemTitle>,
}
