//! Repository for the `reviews` table.

use lodgia_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, Review};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, reservation_id, property_id, guest_id, rating, comment, created_at";

/// Provides review creation and listing. Reviews are immutable.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review. A second review for the same reservation fails
    /// with 23505 on `uq_reviews_reservation`.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (reservation_id, property_id, guest_id, rating, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.reservation_id)
            .bind(input.property_id)
            .bind(input.guest_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// Find the review attached to a reservation, if any.
    pub async fn find_by_reservation(
        pool: &PgPool,
        reservation_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE reservation_id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(reservation_id)
            .fetch_optional(pool)
            .await
    }

    /// List a property's reviews, newest first.
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: DbId,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE property_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(property_id)
            .fetch_all(pool)
            .await
    }
}
