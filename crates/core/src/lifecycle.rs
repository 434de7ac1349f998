//! Reservation lifecycle state machine.
//!
//! `pending -> confirmed -> completed`, with cancellation as a side
//! branch from either non-terminal state. `cancelled` and `completed`
//! are terminal. Settlement is coupled to the transition: confirmation
//! marks the stay paid, cancellation marks it refunded, and the
//! repository applies both columns in one UPDATE so no intermediate
//! state is observable.

use crate::error::CoreError;

/// Reservation status. Stored as lowercase text, constrained by the
/// `reservations` migration CHECK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// Payment status. Stored as lowercase text alongside the reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl ReservationStatus {
    /// Every status, for iterating the transition table.
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Cancelled,
        ReservationStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
        }
    }

    pub fn parse(name: &str) -> Option<ReservationStatus> {
        match name {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            "completed" => Some(ReservationStatus::Completed),
            _ => None,
        }
    }

    /// Statuses that block a property's calendar. The reservations
    /// exclusion constraint is partial over exactly this set.
    pub fn blocks_calendar(self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }

    /// Terminal statuses permit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReservationStatus::Cancelled | ReservationStatus::Completed
        )
    }

    /// The set of statuses reachable from `self`.
    pub fn valid_transitions(self) -> &'static [ReservationStatus] {
        match self {
            ReservationStatus::Pending => {
                &[ReservationStatus::Confirmed, ReservationStatus::Cancelled]
            }
            ReservationStatus::Confirmed => {
                &[ReservationStatus::Completed, ReservationStatus::Cancelled]
            }
            ReservationStatus::Cancelled | ReservationStatus::Completed => &[],
        }
    }

    pub fn can_transition(self, to: ReservationStatus) -> bool {
        self.valid_transitions().contains(&to)
    }
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(name: &str) -> Option<PaymentStatus> {
        match name {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

/// Validate a status transition, returning [`CoreError::InvalidTransition`]
/// for anything outside the lifecycle table.
pub fn validate_transition(
    from: ReservationStatus,
    to: ReservationStatus,
) -> Result<(), CoreError> {
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            from: from.as_str(),
            to: to.as_str(),
        })
    }
}

/// The payment status a transition settles to, when it touches payment
/// at all. Both columns must change in the same statement.
pub fn settlement_on(to: ReservationStatus) -> Option<PaymentStatus> {
    match to {
        ReservationStatus::Confirmed => Some(PaymentStatus::Paid),
        ReservationStatus::Cancelled => Some(PaymentStatus::Refunded),
        ReservationStatus::Pending | ReservationStatus::Completed => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Valid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn pending_to_confirmed() {
        assert!(ReservationStatus::Pending.can_transition(ReservationStatus::Confirmed));
    }

    #[test]
    fn pending_to_cancelled() {
        assert!(ReservationStatus::Pending.can_transition(ReservationStatus::Cancelled));
    }

    #[test]
    fn confirmed_to_completed() {
        assert!(ReservationStatus::Confirmed.can_transition(ReservationStatus::Completed));
    }

    #[test]
    fn confirmed_to_cancelled() {
        assert!(ReservationStatus::Confirmed.can_transition(ReservationStatus::Cancelled));
    }

    // -----------------------------------------------------------------------
    // Terminal states have no outgoing transitions
    // -----------------------------------------------------------------------

    #[test]
    fn cancelled_is_terminal() {
        assert!(ReservationStatus::Cancelled.is_terminal());
        assert!(ReservationStatus::Cancelled.valid_transitions().is_empty());
    }

    #[test]
    fn completed_is_terminal() {
        assert!(ReservationStatus::Completed.is_terminal());
        assert!(ReservationStatus::Completed.valid_transitions().is_empty());
    }

    // -----------------------------------------------------------------------
    // Invalid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn pending_to_completed_invalid() {
        assert!(!ReservationStatus::Pending.can_transition(ReservationStatus::Completed));
    }

    #[test]
    fn cancelled_to_anything_invalid() {
        for to in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Completed,
        ] {
            assert!(!ReservationStatus::Cancelled.can_transition(to));
        }
    }

    #[test]
    fn completed_to_cancelled_invalid() {
        assert!(!ReservationStatus::Completed.can_transition(ReservationStatus::Cancelled));
    }

    #[test]
    fn no_status_transitions_to_pending() {
        for from in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
            ReservationStatus::Completed,
        ] {
            assert!(!from.can_transition(ReservationStatus::Pending));
        }
    }

    #[test]
    fn validate_transition_names_both_states() {
        let err = validate_transition(ReservationStatus::Completed, ReservationStatus::Cancelled)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("completed"));
        assert!(msg.contains("cancelled"));
    }

    // -----------------------------------------------------------------------
    // Settlement coupling
    // -----------------------------------------------------------------------

    #[test]
    fn confirmation_settles_to_paid() {
        assert_eq!(
            settlement_on(ReservationStatus::Confirmed),
            Some(PaymentStatus::Paid)
        );
    }

    #[test]
    fn cancellation_settles_to_refunded() {
        assert_eq!(
            settlement_on(ReservationStatus::Cancelled),
            Some(PaymentStatus::Refunded)
        );
    }

    #[test]
    fn completion_leaves_payment_untouched() {
        assert_eq!(settlement_on(ReservationStatus::Completed), None);
    }

    // -----------------------------------------------------------------------
    // Calendar blocking & string round-trips
    // -----------------------------------------------------------------------

    #[test]
    fn only_pending_and_confirmed_block_the_calendar() {
        assert!(ReservationStatus::Pending.blocks_calendar());
        assert!(ReservationStatus::Confirmed.blocks_calendar());
        assert!(!ReservationStatus::Cancelled.blocks_calendar());
        assert!(!ReservationStatus::Completed.blocks_calendar());
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
            ReservationStatus::Completed,
        ] {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("unknown"), None);
    }

    #[test]
    fn payment_status_round_trips_through_text() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PaymentStatus::parse(""), None);
    }
}
