//! Property (listing) models and DTOs.

use lodgia_core::pricing::StayPricing;
use lodgia_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `properties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub address: String,
    pub surface_m2: i32,
    pub max_guests: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub beds: i32,
    pub price_per_night_cents: i64,
    pub cleaning_fee_cents: i64,
    pub min_nights: i32,
    pub max_nights: i32,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub rules: Vec<String>,
    pub cancellation_policy: String,
    pub check_in_time: String,
    pub check_out_time: String,
    pub category: String,
    pub neighborhood: String,
    pub beach_access: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Property {
    /// The pricing inputs this listing contributes to a booking quote.
    pub fn pricing(&self) -> StayPricing {
        StayPricing {
            price_per_night_cents: self.price_per_night_cents,
            cleaning_fee_cents: self.cleaning_fee_cents,
            min_nights: self.min_nights,
            max_nights: self.max_nights,
        }
    }
}

/// A listing row joined with its review aggregate, as returned by the
/// public search endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PropertyWithRating {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    /// Average review rating, 0.0 when unreviewed.
    pub rating: f64,
    pub reviews_count: i64,
}

/// DTO for creating a new property.
#[derive(Debug, Deserialize)]
pub struct CreateProperty {
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub address: String,
    pub surface_m2: i32,
    pub max_guests: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub beds: i32,
    pub price_per_night_cents: i64,
    pub cleaning_fee_cents: i64,
    pub min_nights: i32,
    pub max_nights: i32,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub rules: Vec<String>,
    pub cancellation_policy: String,
    pub check_in_time: String,
    pub check_out_time: String,
    pub category: String,
    pub neighborhood: String,
    pub beach_access: bool,
}

/// DTO for updating a property. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProperty {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub max_guests: Option<i32>,
    pub price_per_night_cents: Option<i64>,
    pub cleaning_fee_cents: Option<i64>,
    pub min_nights: Option<i32>,
    pub max_nights: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub rules: Option<Vec<String>>,
    pub cancellation_policy: Option<String>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub is_active: Option<bool>,
}

/// Search filters for the public listing endpoint.
///
/// Covers the query surface the storage layer exposes: equality,
/// `gte`/`lte` ranges, and array containment.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyFilter {
    pub property_type: Option<String>,
    pub category: Option<String>,
    pub neighborhood: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub beach_access: Option<bool>,
    /// Listing must carry every requested amenity.
    pub amenities: Option<Vec<String>>,
    pub min_rating: Option<f64>,
}

/// A bookable per-property extra from the `property_services` table.
///
/// Prices live server-side; reservation totals sum these rows, never
/// client-supplied amounts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PropertyService {
    pub id: DbId,
    pub property_id: DbId,
    pub name: String,
    pub price_cents: i64,
    pub created_at: Timestamp,
}

/// DTO for adding a service to a property.
#[derive(Debug, Deserialize)]
pub struct CreatePropertyService {
    pub name: String,
    pub price_cents: i64,
}
