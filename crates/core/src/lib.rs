//! Lodgia domain core.
//!
//! Pure booking-domain logic shared by the persistence and API layers:
//! shared ID/timestamp types, the error taxonomy, the closed role set,
//! the stay availability predicate, the reservation lifecycle state
//! machine, and total-amount pricing. This crate has zero internal
//! dependencies and performs no I/O.

pub mod availability;
pub mod error;
pub mod lifecycle;
pub mod pricing;
pub mod roles;
pub mod types;
