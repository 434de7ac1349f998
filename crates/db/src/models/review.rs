//! Review model and DTOs.

use lodgia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reviews` table. At most one per reservation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub reservation_id: DbId,
    pub property_id: DbId,
    pub guest_id: DbId,
    /// 1..=5 inclusive, enforced by CHECK and request validation.
    pub rating: i32,
    pub comment: String,
    pub created_at: Timestamp,
}

/// Insert DTO built by the review handler after the completed-stay
/// check.
#[derive(Debug)]
pub struct CreateReview {
    pub reservation_id: DbId,
    pub property_id: DbId,
    pub guest_id: DbId,
    pub rating: i32,
    pub comment: String,
}
