//! Handlers for the `/points` resource.
//!
//! Registration arrives as a multipart form (text fields plus one image).
//! The form is validated completely before the image is stored, and the
//! stored image is removed again if the database transaction fails.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ecopoint_core::discovery::PointFilter;
use ecopoint_core::error::CoreError;
use ecopoint_core::image_url::point_image_url;
use ecopoint_core::registration::{Registration, RegistrationForm};
use ecopoint_core::upload::validate_image_extension;
use ecopoint_db::models::point::{CreatePoint, Point, PointItemTitle};
use ecopoint_db::repositories::PointRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::PointId;
use crate::state::AppState;

/// Multipart field carrying the point photo.
const IMAGE_FIELD: &str = "image";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /points?city=&uf=&items=`.
#[derive(Debug, Deserialize)]
pub struct DiscoveryParams {
    pub city: Option<String>,
    pub uf: Option<String>,
    pub items: Option<String>,
}

/// A point as returned to clients, with a resolved image URL.
#[derive(Debug, Serialize)]
pub struct PointResponse {
    #[serde(flatten)]
    pub point: Point,
    pub image_url: String,
}

impl PointResponse {
    fn new(point: Point, base_url: &str) -> Self {
        let image_url = point_image_url(base_url, &point.image);
        Self { point, image_url }
    }
}

/// Response of `GET /points/{id}`.
#[derive(Debug, Serialize)]
pub struct PointDetailResponse {
    pub point: PointResponse,
    pub items: Vec<PointItemTitle>,
}

/// An uploaded image held in memory until the form has been validated.
struct UploadedImage {
    file_name: String,
    data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /points?city=&uf=&items=1,2,3
///
/// List distinct points in the given city and state that accept at least
/// one of the requested items.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<DiscoveryParams>,
) -> AppResult<impl IntoResponse> {
    let filter = PointFilter::parse(
        params.city.as_deref(),
        params.uf.as_deref(),
        params.items.as_deref(),
    )?;

    let base_url = &state.config.public_base_url;
    let points: Vec<PointResponse> = PointRepo::discover(&state.pool, &filter)
        .await?
        .into_iter()
        .map(|p| PointResponse::new(p, base_url))
        .collect();

    tracing::debug!(
        city = %filter.city,
        state = %filter.state,
        matches = points.len(),
        "Point discovery"
    );
    Ok(Json(points))
}

/// GET /points/{id}
///
/// Fetch a single point with the titles of the items it accepts.
pub async fn get_by_id(
    State(state): State<AppState>,
    PointId(id): PointId,
) -> AppResult<impl IntoResponse> {
    let detail = PointRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Point",
                id: id.to_string(),
            })
        })?;

    Ok(Json(PointDetailResponse {
        point: PointResponse::new(detail.point, &state.config.public_base_url),
        items: detail.items,
    }))
}

/// POST /points (multipart/form-data)
///
/// Register a point with its accepted items. Fields: `name`, `email`,
/// `whatsapp`, `latitude`, `longitude`, `city`, `uf`, `items`
/// (comma-separated ids) and one `image` file.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let (form, image) = read_registration_form(multipart, state.config.max_upload_bytes).await?;

    // Everything is validated before any side effect happens.
    let registration = form.validate()?;
    let image =
        image.ok_or_else(|| AppError::BadRequest(format!("Missing required '{IMAGE_FIELD}' file")))?;
    validate_image_extension(&image.file_name)?;

    let filename = state.images.store(&image.file_name, &image.data).await?;

    match register(&state, filename.clone(), &registration).await {
        Ok(point) => {
            tracing::info!(
                point_id = point.id,
                item_count = registration.item_ids.len(),
                "Collection point registered"
            );
            let body = PointResponse::new(point, &state.config.public_base_url);
            Ok((StatusCode::CREATED, Json(body)))
        }
        Err(err) => {
            if let Err(cleanup) = state.images.remove(&filename).await {
                tracing::warn!(%filename, error = %cleanup, "Failed to remove orphaned image");
            }
            Err(err)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run the registration transaction.
///
/// Unknown item ids surface as a foreign-key violation, which
/// [`AppError`] reports as a constraint violation (422).
async fn register(
    state: &AppState,
    image: String,
    registration: &Registration,
) -> AppResult<Point> {
    let input = CreatePoint {
        image,
        details: registration.details.clone(),
    };

    Ok(PointRepo::register(&state.pool, input, &registration.item_ids).await?)
}

/// Drain the multipart stream into a [`RegistrationForm`] and the optional image.
async fn read_registration_form(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> AppResult<(RegistrationForm, Option<UploadedImage>)> {
    let mut form = RegistrationForm::default();
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if data.len() > max_upload_bytes {
                return Err(AppError::BadRequest(format!(
                    "Image exceeds the maximum size of {max_upload_bytes} bytes"
                )));
            }
            image = Some(UploadedImage {
                file_name,
                data: data.to_vec(),
            });
            continue;
        }

        let slot = match name.as_str() {
            "name" => &mut form.name,
            "email" => &mut form.email,
            "whatsapp" => &mut form.whatsapp,
            "latitude" => &mut form.latitude,
            "longitude" => &mut form.longitude,
            "city" => &mut form.city,
            "uf" => &mut form.uf,
            "items" => &mut form.items,
            _ => continue, // ignore unknown fields
        };
        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        *slot = Some(text);
    }

    Ok((form, image))
}
