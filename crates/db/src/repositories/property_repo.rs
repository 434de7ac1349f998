//! Repository for the `properties` and `property_services` tables.

use lodgia_core::types::DbId;
use sqlx::PgPool;

use crate::models::property::{
    CreateProperty, CreatePropertyService, Property, PropertyFilter, PropertyService,
    PropertyWithRating, UpdateProperty,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, description, property_type, address, surface_m2, \
    max_guests, bedrooms, bathrooms, beds, price_per_night_cents, cleaning_fee_cents, \
    min_nights, max_nights, amenities, images, rules, cancellation_policy, check_in_time, \
    check_out_time, category, neighborhood, beach_access, is_active, created_at, updated_at";

const SERVICE_COLUMNS: &str = "id, property_id, name, price_cents, created_at";

/// Provides listing CRUD, filtered search, and per-property services.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a new property, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProperty,
    ) -> Result<Property, sqlx::Error> {
        let query = format!(
            "INSERT INTO properties
                (owner_id, title, description, property_type, address, surface_m2, max_guests,
                 bedrooms, bathrooms, beds, price_per_night_cents, cleaning_fee_cents,
                 min_nights, max_nights, amenities, images, rules, cancellation_policy,
                 check_in_time, check_out_time, category, neighborhood, beach_access)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     $17, $18, $19, $20, $21, $22, $23)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.property_type)
            .bind(&input.address)
            .bind(input.surface_m2)
            .bind(input.max_guests)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.beds)
            .bind(input.price_per_night_cents)
            .bind(input.cleaning_fee_cents)
            .bind(input.min_nights)
            .bind(input.max_nights)
            .bind(&input.amenities)
            .bind(&input.images)
            .bind(&input.rules)
            .bind(&input.cancellation_policy)
            .bind(&input.check_in_time)
            .bind(&input.check_out_time)
            .bind(&input.category)
            .bind(&input.neighborhood)
            .bind(input.beach_access)
            .fetch_one(pool)
            .await
    }

    /// Find a property by internal ID, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active (bookable) property by internal ID.
    pub async fn find_active_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Search active listings with optional filters, joined with their
    /// review aggregate.
    ///
    /// Every filter is an optional bind so the statement stays static:
    /// equality on type/category/neighborhood/beach access, gte/lte on
    /// nightly price, array containment on amenities, and a minimum
    /// average rating over the grouped reviews.
    pub async fn search(
        pool: &PgPool,
        filter: &PropertyFilter,
    ) -> Result<Vec<PropertyWithRating>, sqlx::Error> {
        let query = format!(
            "SELECT p.{cols},
                    COALESCE(r.avg_rating, 0)::float8 AS rating,
                    COALESCE(r.reviews_count, 0) AS reviews_count
             FROM properties p
             LEFT JOIN (
                 SELECT property_id, AVG(rating)::float8 AS avg_rating, COUNT(*) AS reviews_count
                 FROM reviews
                 GROUP BY property_id
             ) r ON r.property_id = p.id
             WHERE p.is_active = true
               AND ($1::text IS NULL OR p.property_type = $1)
               AND ($2::text IS NULL OR p.category = $2)
               AND ($3::text IS NULL OR p.neighborhood = $3)
               AND ($4::bigint IS NULL OR p.price_per_night_cents >= $4)
               AND ($5::bigint IS NULL OR p.price_per_night_cents <= $5)
               AND ($6::boolean IS NULL OR p.beach_access = $6)
               AND ($7::text[] IS NULL OR p.amenities @> $7)
               AND ($8::float8 IS NULL OR COALESCE(r.avg_rating, 0) >= $8)
             ORDER BY p.created_at DESC",
            cols = COLUMNS.replace(", ", ", p.")
        );
        sqlx::query_as::<_, PropertyWithRating>(&query)
            .bind(&filter.property_type)
            .bind(&filter.category)
            .bind(&filter.neighborhood)
            .bind(filter.min_price_cents)
            .bind(filter.max_price_cents)
            .bind(filter.beach_access)
            .bind(&filter.amenities)
            .bind(filter.min_rating)
            .fetch_all(pool)
            .await
    }

    /// List all properties belonging to an owner, including inactive ones.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM properties WHERE owner_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Property>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update a property. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProperty,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            "UPDATE properties SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                max_guests = COALESCE($5, max_guests),
                price_per_night_cents = COALESCE($6, price_per_night_cents),
                cleaning_fee_cents = COALESCE($7, cleaning_fee_cents),
                min_nights = COALESCE($8, min_nights),
                max_nights = COALESCE($9, max_nights),
                amenities = COALESCE($10, amenities),
                images = COALESCE($11, images),
                rules = COALESCE($12, rules),
                cancellation_policy = COALESCE($13, cancellation_policy),
                check_in_time = COALESCE($14, check_in_time),
                check_out_time = COALESCE($15, check_out_time),
                is_active = COALESCE($16, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.address)
            .bind(input.max_guests)
            .bind(input.price_per_night_cents)
            .bind(input.cleaning_fee_cents)
            .bind(input.min_nights)
            .bind(input.max_nights)
            .bind(&input.amenities)
            .bind(&input.images)
            .bind(&input.rules)
            .bind(&input.cancellation_policy)
            .bind(&input.check_in_time)
            .bind(&input.check_out_time)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a listing. Properties are never hard-deleted
    /// while reservations reference them; history stays intact.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE properties SET is_active = false, updated_at = NOW()
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count active listings.
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM properties WHERE is_active = true")
            .fetch_one(pool)
            .await
    }

    // ── Additional services ──────────────────────────────────────────

    /// Add a bookable extra to a property.
    pub async fn add_service(
        pool: &PgPool,
        property_id: DbId,
        input: &CreatePropertyService,
    ) -> Result<PropertyService, sqlx::Error> {
        let query = format!(
            "INSERT INTO property_services (property_id, name, price_cents)
             VALUES ($1, $2, $3)
             RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as::<_, PropertyService>(&query)
            .bind(property_id)
            .bind(&input.name)
            .bind(input.price_cents)
            .fetch_one(pool)
            .await
    }

    /// List a property's bookable extras.
    pub async fn list_services(
        pool: &PgPool,
        property_id: DbId,
    ) -> Result<Vec<PropertyService>, sqlx::Error> {
        let query = format!(
            "SELECT {SERVICE_COLUMNS} FROM property_services WHERE property_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, PropertyService>(&query)
            .bind(property_id)
            .fetch_all(pool)
            .await
    }

    /// Resolve selected service ids against one property. Ids pointing
    /// at other properties simply do not resolve, so a booking cannot
    /// pull in another listing's prices.
    pub async fn list_services_by_ids(
        pool: &PgPool,
        property_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<PropertyService>, sqlx::Error> {
        let query = format!(
            "SELECT {SERVICE_COLUMNS} FROM property_services
             WHERE property_id = $1 AND id = ANY($2)
             ORDER BY id"
        );
        sqlx::query_as::<_, PropertyService>(&query)
            .bind(property_id)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
