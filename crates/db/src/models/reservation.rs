//! Reservation models and DTOs.

use chrono::NaiveDate;
use lodgia_core::lifecycle::{PaymentStatus, ReservationStatus};
use lodgia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `reservations` table.
///
/// Rows are never deleted; terminal statuses keep booking history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub property_id: DbId,
    pub guest_id: DbId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub infants: i32,
    pub pets: i32,
    pub total_amount_cents: i64,
    /// Lifecycle status; parse with [`ReservationStatus::parse`].
    pub status: String,
    pub payment_method: String,
    /// Settlement status; parse with [`PaymentStatus::parse`].
    pub payment_status: String,
    pub special_requests: Option<String>,
    /// Client-supplied retry token; unique among non-null values.
    pub idempotency_key: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    pub fn status(&self) -> Option<ReservationStatus> {
        ReservationStatus::parse(&self.status)
    }

    pub fn payment_status(&self) -> Option<PaymentStatus> {
        PaymentStatus::parse(&self.payment_status)
    }
}

/// Insert DTO built by the booking handler after validation and
/// pricing. `total_amount_cents` is always derived, never client input.
#[derive(Debug)]
pub struct CreateReservation {
    pub property_id: DbId,
    pub guest_id: DbId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub infants: i32,
    pub pets: i32,
    pub total_amount_cents: i64,
    pub payment_method: String,
    pub special_requests: Option<String>,
    pub idempotency_key: Option<Uuid>,
}

/// Per-owner reservation statistics for the dashboard.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct OwnerStats {
    pub total_reservations: i64,
    /// Revenue from confirmed and completed stays, in cents.
    pub total_revenue_cents: i64,
    pub pending_reservations: i64,
    pub confirmed_reservations: i64,
    pub completed_reservations: i64,
    pub cancelled_reservations: i64,
}

/// One selected additional service, denormalized onto the reservation
/// in `reservation_services` at booking time so later price edits do
/// not rewrite history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReservationService {
    pub id: DbId,
    pub reservation_id: DbId,
    pub name: String,
    pub price_cents: i64,
}
