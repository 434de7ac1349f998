//! Stay date ranges and the availability predicate.
//!
//! Ranges are half-open `[check_in, check_out)`: a stay ending on the
//! day another begins does not collide, so back-to-back bookings are
//! allowed. The same rule is enforced at write time by the exclusion
//! constraint in the reservations migration; this module is the pure,
//! read-side form of it.

use chrono::NaiveDate;

use crate::error::CoreError;

/// A validated half-open stay range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    /// Build a range, rejecting `check_in >= check_out` with
    /// [`CoreError::InvalidRange`].
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<StayRange, CoreError> {
        if check_in >= check_out {
            return Err(CoreError::InvalidRange {
                check_in,
                check_out,
            });
        }
        Ok(StayRange {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Stay length in whole nights. Always >= 1 for a validated range.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Half-open interval intersection: `[a, b)` and `[c, d)` overlap
    /// iff `a < d && c < b`. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

/// Whether `candidate` can be booked given the property's active
/// (pending or confirmed) reservation ranges. No side effects.
///
/// Zero existing reservations means always available. This is the
/// read-then-decide fast path only: the write-time authority is the
/// storage-layer exclusion constraint, so a concurrent booking that
/// slips past this check still fails the insert.
pub fn is_range_available(candidate: &StayRange, existing: &[StayRange]) -> bool {
    existing.iter().all(|taken| !candidate.overlaps(taken))
}
