//! Handlers for the `/properties` resource: listing CRUD, filtered
//! search, the availability probe, per-property services, reviews, and
//! the owner's reservation calendar.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use lodgia_core::availability::{is_range_available, StayRange};
use lodgia_core::error::CoreError;
use lodgia_core::types::DbId;
use lodgia_db::models::property::{
    CreateProperty, CreatePropertyService, Property, PropertyFilter, PropertyService,
    PropertyWithRating, UpdateProperty,
};
use lodgia_db::models::reservation::Reservation;
use lodgia_db::models::review::Review;
use lodgia_db::repositories::{PropertyRepo, ReservationRepo, ReviewRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::auth::ensure_owns;
use crate::middleware::rbac::{RequireAuth, RequireHost};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /properties`.
///
/// Scalar filters map straight onto [`PropertyFilter`]; `amenities` is
/// a comma-separated list (`?amenities=wifi,pool`).
#[derive(Debug, Default, Deserialize)]
pub struct PropertySearchQuery {
    pub property_type: Option<String>,
    pub category: Option<String>,
    pub neighborhood: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub beach_access: Option<bool>,
    pub amenities: Option<String>,
    pub min_rating: Option<f64>,
}

impl PropertySearchQuery {
    fn into_filter(self) -> PropertyFilter {
        let amenities = self.amenities.map(|list| {
            list.split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect::<Vec<_>>()
        });
        PropertyFilter {
            property_type: self.property_type,
            category: self.category,
            neighborhood: self.neighborhood,
            min_price_cents: self.min_price_cents,
            max_price_cents: self.max_price_cents,
            beach_access: self.beach_access,
            amenities: amenities.filter(|a| !a.is_empty()),
            min_rating: self.min_rating,
        }
    }
}

/// Query parameters for `GET /properties/{id}/availability`.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// Response body for the availability probe.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/properties
///
/// Create a listing owned by the authenticated owner/admin.
pub async fn create(
    State(state): State<AppState>,
    RequireHost(user): RequireHost,
    Json(input): Json<CreateProperty>,
) -> AppResult<(StatusCode, Json<Property>)> {
    validate_listing(&input)?;
    let property = PropertyRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(property_id = property.id, owner_id = user.user_id, "Listing created");
    Ok((StatusCode::CREATED, Json(property)))
}

/// GET /api/v1/properties
///
/// Public filtered search over active listings.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PropertySearchQuery>,
) -> AppResult<Json<Vec<PropertyWithRating>>> {
    let properties = PropertyRepo::search(&state.pool, &query.into_filter()).await?;
    Ok(Json(properties))
}

/// GET /api/v1/properties/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Property>> {
    let property = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;
    Ok(Json(property))
}

/// PUT /api/v1/properties/{id}
///
/// Update a listing. Only the owning user (or an admin) may mutate it.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProperty>,
) -> AppResult<Json<Property>> {
    let property = fetch_property(&state, id).await?;
    ensure_owns(&user, property.owner_id, "listing")?;

    if let (Some(min), Some(max)) = (input.min_nights, input.max_nights) {
        if min <= 0 || min > max {
            return Err(AppError::Core(CoreError::Validation(
                "min_nights must be positive and <= max_nights".into(),
            )));
        }
    }

    let updated = PropertyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/properties/{id}
///
/// Listings are never hard-deleted while reservations reference them:
/// delete soft-deactivates, hiding the listing from search and booking.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let property = fetch_property(&state, id).await?;
    ensure_owns(&user, property.owner_id, "listing")?;

    PropertyRepo::deactivate(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/properties/{id}/availability
///
/// Pure availability probe for a candidate date range. Read-only; the
/// booking insert re-checks at write time via the exclusion constraint.
pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    // Range validation happens before touching the database.
    let candidate = StayRange::new(query.check_in, query.check_out).map_err(AppError::Core)?;

    let property = fetch_property(&state, id).await?;
    if !property.is_active {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }));
    }

    let taken = active_ranges(&state, id).await?;
    Ok(Json(AvailabilityResponse {
        available: is_range_available(&candidate, &taken),
    }))
}

/// GET /api/v1/properties/{id}/reservations
///
/// The owner's calendar view. Restricted to the listing's owner or an
/// admin.
pub async fn list_reservations(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Reservation>>> {
    let property = fetch_property(&state, id).await?;
    ensure_owns(&user, property.owner_id, "reservation calendar")?;

    let reservations = ReservationRepo::list_by_property(&state.pool, id).await?;
    Ok(Json(reservations))
}

/// GET /api/v1/properties/{id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Review>>> {
    fetch_property(&state, id).await?;
    let reviews = ReviewRepo::list_by_property(&state.pool, id).await?;
    Ok(Json(reviews))
}

/// GET /api/v1/properties/{id}/services
pub async fn list_services(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<PropertyService>>> {
    fetch_property(&state, id).await?;
    let services = PropertyRepo::list_services(&state.pool, id).await?;
    Ok(Json(services))
}

/// POST /api/v1/properties/{id}/services
///
/// Add a bookable extra. Owner or admin only.
pub async fn add_service(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePropertyService>,
) -> AppResult<(StatusCode, Json<PropertyService>)> {
    if input.price_cents < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Service price must not be negative".into(),
        )));
    }
    let property = fetch_property(&state, id).await?;
    ensure_owns(&user, property.owner_id, "listing")?;

    let service = PropertyRepo::add_service(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fetch_property(state: &AppState, id: DbId) -> Result<Property, AppError> {
    PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))
}

/// Load the calendar-blocking ranges for a property as validated
/// [`StayRange`]s. Stored rows always satisfy `check_in < check_out`
/// (CHECK constraint), so conversion cannot fail for well-formed data.
pub(crate) async fn active_ranges(state: &AppState, id: DbId) -> Result<Vec<StayRange>, AppError> {
    let rows = ReservationRepo::list_active_ranges(&state.pool, id).await?;
    rows.into_iter()
        .map(|(check_in, check_out)| StayRange::new(check_in, check_out).map_err(AppError::Core))
        .collect()
}

/// Pre-insert validation of listing invariants; the table CHECKs back
/// these up, but rejecting here keeps the error readable.
fn validate_listing(input: &CreateProperty) -> Result<(), AppError> {
    if input.min_nights <= 0 || input.min_nights > input.max_nights {
        return Err(AppError::Core(CoreError::Validation(
            "min_nights must be positive and <= max_nights".into(),
        )));
    }
    if input.price_per_night_cents < 0 || input.cleaning_fee_cents < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Prices must not be negative".into(),
        )));
    }
    if input.max_guests <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "max_guests must be positive".into(),
        )));
    }
    Ok(())
}
