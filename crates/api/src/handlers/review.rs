//! Handlers for the `/reviews` resource.
//!
//! A review belongs to exactly one reservation, is written by its
//! guest, and only after the stay has completed. The unique constraint
//! on the reservation backs the once-only rule against races.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use lodgia_core::error::CoreError;
use lodgia_core::lifecycle::ReservationStatus;
use lodgia_core::types::DbId;
use lodgia_db::models::review::{CreateReview, Review};
use lodgia_db::repositories::{ReservationRepo, ReviewRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// Request body for `POST /reviews`.
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewRequest {
    pub reservation_id: DbId,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1, message = "comment must not be empty"))]
    pub comment: String,
}

/// POST /api/v1/reviews
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<ReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let reservation = ReservationRepo::find_by_id(&state.pool, input.reservation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reservation",
            id: input.reservation_id,
        }))?;

    if reservation.guest_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the guest of a stay may review it".into(),
        )));
    }

    if reservation.status() != Some(ReservationStatus::Completed) {
        return Err(AppError::Core(CoreError::Validation(
            "Only completed stays can be reviewed".into(),
        )));
    }

    if ReviewRepo::find_by_reservation(&state.pool, reservation.id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "This stay has already been reviewed".into(),
        )));
    }

    // A duplicate racing past the check above still fails on
    // uq_reviews_reservation and surfaces as 409.
    let review = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            reservation_id: reservation.id,
            property_id: reservation.property_id,
            guest_id: user.user_id,
            rating: input.rating,
            comment: input.comment,
        },
    )
    .await?;

    tracing::info!(review_id = review.id, reservation_id = reservation.id, "Review posted");
    Ok((StatusCode::CREATED, Json(review)))
}
