//! Custom extractors whose rejections use the JSON error envelope.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use ecopoint_core::error::CoreError;
use ecopoint_core::types::DbId;

use crate::error::AppError;

/// The `{id}` path segment of `/points/{id}`.
///
/// A segment that is not a valid id can never name a stored point, so it is
/// rejected as a missing point (404) rather than as a malformed request.
#[derive(Debug, Clone, Copy)]
pub struct PointId(pub DbId);

impl<S> FromRequestParts<S> for PointId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found(String::new()))?;

        match raw.trim().parse::<DbId>() {
            Ok(id) if id > 0 => Ok(PointId(id)),
            _ => Err(not_found(raw)),
        }
    }
}

fn not_found(id: String) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Point",
        id,
    })
}
