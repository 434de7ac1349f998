use chrono::NaiveDate;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A stay range where `check_in >= check_out`. Rejected before any
    /// database call.
    #[error("Invalid date range: check-in {check_in} must be before check-out {check_out}")]
    InvalidRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    /// A stay duration outside the property's `[min_nights, max_nights]`.
    #[error("Invalid stay length: {nights} nights (allowed: {min_nights}..={max_nights})")]
    InvalidNights {
        nights: i64,
        min_nights: i32,
        max_nights: i32,
    },

    /// The requested range collides with an active reservation. Surfaced
    /// verbatim from the storage constraint, never silently retried.
    #[error("Property {property_id} is not available for the requested dates")]
    RangeUnavailable { property_id: DbId },

    /// A reservation status change not permitted by the lifecycle table.
    #[error("Invalid reservation transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    /// A timeout or connectivity failure. Safe to retry with the same
    /// idempotency key.
    #[error("Transient storage error: {0}")]
    Transient(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
