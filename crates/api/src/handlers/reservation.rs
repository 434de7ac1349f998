//! Handlers for the `/reservations` resource: booking creation and the
//! lifecycle transitions (confirm, cancel, complete).
//!
//! Creation order matters: range and guest-count validation run before
//! any database call; the availability pre-check then fails fast with a
//! clean error; and the INSERT itself is the authority -- if a
//! concurrent booking wins the race between check and insert, the
//! exclusion constraint rejects this one and the loss is surfaced as
//! range-unavailable, never retried silently.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use lodgia_core::availability::{is_range_available, StayRange};
use lodgia_core::error::CoreError;
use lodgia_core::lifecycle::{validate_transition, ReservationStatus};
use lodgia_core::pricing::quote_total_cents;
use lodgia_core::roles::Role;
use lodgia_core::types::DbId;
use lodgia_db::models::reservation::{CreateReservation, Reservation, ReservationService};
use lodgia_db::repositories::{PropertyRepo, ReservationRepo};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::property::active_ranges;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /reservations`.
///
/// The total is never part of the request; it is derived from the
/// listing's pricing and the selected services.
#[derive(Debug, Deserialize, Validate)]
pub struct BookingRequest {
    pub property_id: DbId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1))]
    pub adults: i32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub children: i32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub infants: i32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub pets: i32,
    pub payment_method: String,
    pub special_requests: Option<String>,
    /// Ids of the property's bookable extras to add to the stay.
    #[serde(default)]
    pub service_ids: Vec<DbId>,
    /// Client-generated token making a retried create at-most-once.
    pub idempotency_key: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/reservations
///
/// Book a stay. Returns 201 with the new reservation, or 200 with the
/// previously created row when an idempotency key is replayed.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<BookingRequest>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    // 1. Pure validation, before any network call.
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    let candidate = StayRange::new(input.check_in, input.check_out).map_err(AppError::Core)?;

    // 2. Idempotent replay: a key we have already applied returns the
    //    original row instead of booking twice.
    if let Some(key) = input.idempotency_key {
        if let Some(existing) = ReservationRepo::find_by_idempotency_key(&state.pool, key).await? {
            tracing::info!(reservation_id = existing.id, %key, "Replayed booking request");
            return Ok((StatusCode::OK, Json(existing)));
        }
    }

    // 3. The listing must exist and be bookable.
    let property = PropertyRepo::find_active_by_id(&state.pool, input.property_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id: input.property_id,
        }))?;

    if input.adults + input.children > property.max_guests {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Party exceeds the maximum of {} guests",
            property.max_guests
        ))));
    }

    // 4. Resolve selected services against this listing; unknown ids are
    //    a validation error, not silently dropped.
    let services =
        PropertyRepo::list_services_by_ids(&state.pool, property.id, &input.service_ids).await?;
    if services.len() != input.service_ids.len() {
        return Err(AppError::Core(CoreError::Validation(
            "One or more selected services do not belong to this property".into(),
        )));
    }

    // 5. Derive the total; rejects stays outside [min_nights, max_nights].
    let service_prices: Vec<i64> = services.iter().map(|s| s.price_cents).collect();
    let total_amount_cents =
        quote_total_cents(&property.pricing(), candidate.nights(), &service_prices)
            .map_err(AppError::Core)?;

    // 6. Read-side availability check: fail fast with a clean error.
    let taken = active_ranges(&state, property.id).await?;
    if !is_range_available(&candidate, &taken) {
        return Err(AppError::Core(CoreError::RangeUnavailable {
            property_id: property.id,
        }));
    }

    // 7. Insert. The exclusion constraint decides races the pre-check
    //    could not see; a replayed key that raced step 2 returns the
    //    winner's row.
    let create = CreateReservation {
        property_id: property.id,
        guest_id: user.user_id,
        check_in: input.check_in,
        check_out: input.check_out,
        adults: input.adults,
        children: input.children,
        infants: input.infants,
        pets: input.pets,
        total_amount_cents,
        payment_method: input.payment_method,
        special_requests: input.special_requests,
        idempotency_key: input.idempotency_key,
    };
    match ReservationRepo::create(&state.pool, &create, &services).await {
        Ok(reservation) => {
            tracing::info!(
                reservation_id = reservation.id,
                property_id = property.id,
                guest_id = user.user_id,
                "Reservation created"
            );
            Ok((StatusCode::CREATED, Json(reservation)))
        }
        Err(err) if lodgia_db::is_overlap_violation(&err) => {
            Err(AppError::Core(CoreError::RangeUnavailable {
                property_id: property.id,
            }))
        }
        Err(err) if lodgia_db::is_unique_violation(&err, "uq_reservations_idempotency_key") => {
            let key = create.idempotency_key.ok_or_else(|| {
                AppError::InternalError("Idempotency conflict without a key".into())
            })?;
            let existing = ReservationRepo::find_by_idempotency_key(&state.pool, key)
                .await?
                .ok_or_else(|| {
                    AppError::InternalError("Idempotency key vanished after conflict".into())
                })?;
            Ok((StatusCode::OK, Json(existing)))
        }
        Err(err) if lodgia_db::is_transient(&err) => {
            Err(AppError::Core(CoreError::Transient(err.to_string())))
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /api/v1/reservations/mine
///
/// The authenticated guest's bookings, newest first.
pub async fn mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = ReservationRepo::list_by_guest(&state.pool, user.user_id).await?;
    Ok(Json(reservations))
}

/// GET /api/v1/reservations/{id}
///
/// Visible to the guest, the property's owner, and admins.
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Reservation>> {
    let reservation = fetch_reservation(&state, id).await?;
    ensure_party(&state, &user, &reservation).await?;
    Ok(Json(reservation))
}

/// GET /api/v1/reservations/{id}/services
pub async fn list_services(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<ReservationService>>> {
    let reservation = fetch_reservation(&state, id).await?;
    ensure_party(&state, &user, &reservation).await?;
    let services = ReservationRepo::list_services(&state.pool, id).await?;
    Ok(Json(services))
}

/// POST /api/v1/reservations/{id}/confirm
///
/// Owner/admin confirms a pending stay; payment settles to `paid` in
/// the same statement.
pub async fn confirm(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Reservation>> {
    let reservation = fetch_reservation(&state, id).await?;
    ensure_property_owner(&state, &user, &reservation).await?;

    let current = parse_status(&reservation)?;
    validate_transition(current, ReservationStatus::Confirmed).map_err(AppError::Core)?;

    apply_transition(
        ReservationRepo::confirm(&state.pool, id).await?,
        &state,
        id,
        ReservationStatus::Confirmed,
    )
    .await
}

/// POST /api/v1/reservations/{id}/cancel
///
/// Guest, property owner, or admin cancels a stay that is not yet
/// terminal. `status` and `payment_status` change together: the row is
/// `cancelled`/`refunded` or untouched, never in between.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Reservation>> {
    let reservation = fetch_reservation(&state, id).await?;
    ensure_party(&state, &user, &reservation).await?;

    let current = parse_status(&reservation)?;
    validate_transition(current, ReservationStatus::Cancelled).map_err(AppError::Core)?;

    apply_transition(
        ReservationRepo::cancel(&state.pool, id).await?,
        &state,
        id,
        ReservationStatus::Cancelled,
    )
    .await
}

/// POST /api/v1/reservations/{id}/complete
///
/// Admin marks a confirmed stay completed once its check-out date has
/// passed. The background sweep performs the same transition
/// automatically.
pub async fn complete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Reservation>> {
    let reservation = fetch_reservation(&state, id).await?;

    let current = parse_status(&reservation)?;
    validate_transition(current, ReservationStatus::Completed).map_err(AppError::Core)?;

    let today = Utc::now().date_naive();
    if reservation.check_out > today {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Stay cannot complete before its check-out date {}",
            reservation.check_out
        ))));
    }

    apply_transition(
        ReservationRepo::complete(&state.pool, id).await?,
        &state,
        id,
        ReservationStatus::Completed,
    )
    .await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fetch_reservation(state: &AppState, id: DbId) -> Result<Reservation, AppError> {
    ReservationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reservation",
            id,
        }))
}

fn parse_status(reservation: &Reservation) -> Result<ReservationStatus, AppError> {
    reservation.status().ok_or_else(|| {
        AppError::InternalError(format!(
            "Reservation {} has unknown status '{}'",
            reservation.id, reservation.status
        ))
    })
}

/// The guest and the property's owner share read/cancel rights on a
/// reservation; admins see everything.
async fn ensure_party(
    state: &AppState,
    user: &AuthUser,
    reservation: &Reservation,
) -> Result<(), AppError> {
    if user.role == Role::Admin || user.user_id == reservation.guest_id {
        return Ok(());
    }
    if property_owner_id(state, reservation).await? == user.user_id {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "Not a party to this reservation".into(),
    )))
}

/// Only the property's owner (or an admin) confirms.
async fn ensure_property_owner(
    state: &AppState,
    user: &AuthUser,
    reservation: &Reservation,
) -> Result<(), AppError> {
    if user.role == Role::Admin || property_owner_id(state, reservation).await? == user.user_id {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the property owner may do this".into(),
        )))
    }
}

async fn property_owner_id(
    state: &AppState,
    reservation: &Reservation,
) -> Result<DbId, AppError> {
    let property = PropertyRepo::find_by_id(&state.pool, reservation.property_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id: reservation.property_id,
        }))?;
    Ok(property.owner_id)
}

/// Resolve the outcome of a conditional transition UPDATE. `None` means
/// the row changed under us between fetch and update: re-read and
/// report the transition that actually failed.
async fn apply_transition(
    updated: Option<Reservation>,
    state: &AppState,
    id: DbId,
    to: ReservationStatus,
) -> AppResult<Json<Reservation>> {
    match updated {
        Some(reservation) => {
            tracing::info!(reservation_id = id, status = to.as_str(), "Reservation transitioned");
            Ok(Json(reservation))
        }
        None => {
            let current = parse_status(&fetch_reservation(state, id).await?)?;
            Err(AppError::Core(CoreError::InvalidTransition {
                from: current.as_str(),
                to: to.as_str(),
            }))
        }
    }
}
