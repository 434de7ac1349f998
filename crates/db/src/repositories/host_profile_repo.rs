//! Repository for the `host_profiles` table.

use lodgia_core::types::DbId;
use sqlx::PgPool;

use crate::models::host_profile::{CreateHostProfile, HostProfile, UpdateHostProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, selected_package, commission_rate_bps, description, \
    languages, profession, hosting_frequency, accommodation_type, payout_method, \
    is_verified, created_at, updated_at";

/// Provides host-onboarding profile operations.
pub struct HostProfileRepo;

impl HostProfileRepo {
    /// Insert a host profile. A second profile for the same user fails
    /// with 23505 on `uq_host_profiles_user`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateHostProfile,
    ) -> Result<HostProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO host_profiles
                (user_id, selected_package, commission_rate_bps, description, languages,
                 profession, hosting_frequency, accommodation_type, payout_method)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HostProfile>(&query)
            .bind(user_id)
            .bind(&input.selected_package)
            .bind(input.commission_rate_bps)
            .bind(&input.description)
            .bind(&input.languages)
            .bind(&input.profession)
            .bind(&input.hosting_frequency)
            .bind(&input.accommodation_type)
            .bind(&input.payout_method)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<HostProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM host_profiles WHERE id = $1");
        sqlx::query_as::<_, HostProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the profile belonging to a user.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<HostProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM host_profiles WHERE user_id = $1");
        sqlx::query_as::<_, HostProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List verified hosts.
    pub async fn list_verified(pool: &PgPool) -> Result<Vec<HostProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM host_profiles WHERE is_verified = true ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, HostProfile>(&query).fetch_all(pool).await
    }

    /// Update a profile. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHostProfile,
    ) -> Result<Option<HostProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE host_profiles SET
                selected_package = COALESCE($2, selected_package),
                description = COALESCE($3, description),
                languages = COALESCE($4, languages),
                profession = COALESCE($5, profession),
                hosting_frequency = COALESCE($6, hosting_frequency),
                accommodation_type = COALESCE($7, accommodation_type),
                payout_method = COALESCE($8, payout_method),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HostProfile>(&query)
            .bind(id)
            .bind(&input.selected_package)
            .bind(&input.description)
            .bind(&input.languages)
            .bind(&input.profession)
            .bind(&input.hosting_frequency)
            .bind(&input.accommodation_type)
            .bind(&input.payout_method)
            .fetch_optional(pool)
            .await
    }

    /// Mark a profile verified (admin operation).
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_verified(
        pool: &PgPool,
        id: DbId,
        verified: bool,
    ) -> Result<Option<HostProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE host_profiles SET is_verified = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HostProfile>(&query)
            .bind(id)
            .bind(verified)
            .fetch_optional(pool)
            .await
    }
}
