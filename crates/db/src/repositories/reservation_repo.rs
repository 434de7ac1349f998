//! Repository for the `reservations` table.
//!
//! The no-overlap invariant is enforced here at the atomic boundary:
//! `create` is a plain INSERT whose fate is decided by the
//! `ex_reservations_no_overlap` exclusion constraint, and every
//! lifecycle transition is a single conditional UPDATE that changes
//! `status` and `payment_status` together.

use chrono::NaiveDate;
use lodgia_core::lifecycle::{settlement_on, ReservationStatus};
use lodgia_core::types::DbId;
use sqlx::PgPool;

use crate::models::property::PropertyService;
use crate::models::reservation::{
    CreateReservation, OwnerStats, Reservation, ReservationService,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, property_id, guest_id, check_in, check_out, adults, children, \
    infants, pets, total_amount_cents, status, payment_method, payment_status, \
    special_requests, idempotency_key, created_at, updated_at";

/// Provides booking creation, lifecycle transitions, and reporting.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Insert a new reservation in `pending`/`pending` together with its
    /// selected services, in one transaction.
    ///
    /// An overlap with an active stay aborts the whole transaction with
    /// SQLSTATE 23P01 (see [`crate::is_overlap_violation`]); a replayed
    /// idempotency key aborts with 23505 on
    /// `uq_reservations_idempotency_key`. Neither case leaves a partial
    /// row behind.
    pub async fn create(
        pool: &PgPool,
        input: &CreateReservation,
        services: &[PropertyService],
    ) -> Result<Reservation, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO reservations
                (property_id, guest_id, check_in, check_out, adults, children, infants, pets,
                 total_amount_cents, payment_method, special_requests, idempotency_key)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        let reservation = sqlx::query_as::<_, Reservation>(&query)
            .bind(input.property_id)
            .bind(input.guest_id)
            .bind(input.check_in)
            .bind(input.check_out)
            .bind(input.adults)
            .bind(input.children)
            .bind(input.infants)
            .bind(input.pets)
            .bind(input.total_amount_cents)
            .bind(&input.payment_method)
            .bind(&input.special_requests)
            .bind(input.idempotency_key)
            .fetch_one(&mut *tx)
            .await?;

        // Denormalize selected service names/prices so later edits to the
        // property's service list do not rewrite booking history.
        for service in services {
            sqlx::query(
                "INSERT INTO reservation_services (reservation_id, name, price_cents)
                 VALUES ($1, $2, $3)",
            )
            .bind(reservation.id)
            .bind(&service.name)
            .bind(service.price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(reservation)
    }

    /// Find a reservation by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a reservation by its client-supplied idempotency key.
    pub async fn find_by_idempotency_key(
        pool: &PgPool,
        key: uuid::Uuid,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE idempotency_key = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// List a guest's reservations, most recent first.
    pub async fn list_by_guest(
        pool: &PgPool,
        guest_id: DbId,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations WHERE guest_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(guest_id)
            .fetch_all(pool)
            .await
    }

    /// List a property's reservations ordered by check-in.
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: DbId,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations WHERE property_id = $1 ORDER BY check_in"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(property_id)
            .fetch_all(pool)
            .await
    }

    /// The calendar-blocking `[check_in, check_out)` pairs for a
    /// property: reservations still in `pending` or `confirmed`.
    pub async fn list_active_ranges(
        pool: &PgPool,
        property_id: DbId,
    ) -> Result<Vec<(NaiveDate, NaiveDate)>, sqlx::Error> {
        sqlx::query_as::<_, (NaiveDate, NaiveDate)>(
            "SELECT check_in, check_out FROM reservations
             WHERE property_id = $1 AND status IN ('pending', 'confirmed')
             ORDER BY check_in",
        )
        .bind(property_id)
        .fetch_all(pool)
        .await
    }

    /// Confirm a pending reservation, marking it paid in the same
    /// statement.
    ///
    /// Returns `None` when the row is missing or not `pending`; callers
    /// distinguish the two with a follow-up fetch.
    pub async fn confirm(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        Self::transition(pool, id, ReservationStatus::Confirmed).await
    }

    /// Cancel a pending or confirmed reservation.
    ///
    /// `status = 'cancelled'` and `payment_status = 'refunded'` are
    /// applied by one UPDATE: there is no observable state with one
    /// changed and not the other.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        Self::transition(pool, id, ReservationStatus::Cancelled).await
    }

    /// Mark a confirmed reservation completed.
    pub async fn complete(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        Self::transition(pool, id, ReservationStatus::Completed).await
    }

    /// One conditional UPDATE per lifecycle transition, derived from the
    /// core transition table so SQL and state machine cannot diverge:
    /// the WHERE clause admits exactly the statuses that may reach `to`,
    /// and any payment settlement coupled to `to` lands in the same
    /// statement. All interpolated values are `'static` status names.
    async fn transition(
        pool: &PgPool,
        id: DbId,
        to: ReservationStatus,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let sources: Vec<String> = ReservationStatus::ALL
            .iter()
            .filter(|from| from.can_transition(to))
            .map(|from| format!("'{}'", from.as_str()))
            .collect();
        if sources.is_empty() {
            // Nothing may reach `to` (e.g. back to pending); no-op.
            return Ok(None);
        }
        let settlement = match settlement_on(to) {
            Some(payment) => format!(", payment_status = '{}'", payment.as_str()),
            None => String::new(),
        };
        let query = format!(
            "UPDATE reservations
             SET status = '{to}'{settlement}, updated_at = NOW()
             WHERE id = $1 AND status IN ({sources})
             RETURNING {COLUMNS}",
            to = to.as_str(),
            sources = sources.join(", "),
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Sweep every confirmed reservation whose check-out is on or before
    /// `cutoff` into `completed`. Returns the number of rows moved.
    pub async fn complete_due(pool: &PgPool, cutoff: NaiveDate) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reservations
             SET status = 'completed', updated_at = NOW()
             WHERE status = 'confirmed' AND check_out <= $1",
        )
        .bind(cutoff)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count all reservations ever taken.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(pool)
            .await
    }

    /// Aggregate reservation statistics across an owner's properties.
    pub async fn owner_stats(pool: &PgPool, owner_id: DbId) -> Result<OwnerStats, sqlx::Error> {
        sqlx::query_as::<_, OwnerStats>(
            "SELECT
                COUNT(*) AS total_reservations,
                COALESCE(SUM(r.total_amount_cents)
                    FILTER (WHERE r.status IN ('confirmed', 'completed')), 0)::bigint
                    AS total_revenue_cents,
                COUNT(*) FILTER (WHERE r.status = 'pending') AS pending_reservations,
                COUNT(*) FILTER (WHERE r.status = 'confirmed') AS confirmed_reservations,
                COUNT(*) FILTER (WHERE r.status = 'completed') AS completed_reservations,
                COUNT(*) FILTER (WHERE r.status = 'cancelled') AS cancelled_reservations
             FROM reservations r
             JOIN properties p ON p.id = r.property_id
             WHERE p.owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// List the services booked with a reservation.
    pub async fn list_services(
        pool: &PgPool,
        reservation_id: DbId,
    ) -> Result<Vec<ReservationService>, sqlx::Error> {
        sqlx::query_as::<_, ReservationService>(
            "SELECT id, reservation_id, name, price_cents
             FROM reservation_services
             WHERE reservation_id = $1
             ORDER BY id",
        )
        .bind(reservation_id)
        .fetch_all(pool)
        .await
    }
}
