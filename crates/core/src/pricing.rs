//! Total-amount pricing for a stay.
//!
//! Amounts are integer minor currency units (cents). The total is
//! derived server-side at creation time only; clients never supply it.

use crate::error::CoreError;

/// The pricing inputs a property contributes to a quote.
#[derive(Debug, Clone, Copy)]
pub struct StayPricing {
    pub price_per_night_cents: i64,
    pub cleaning_fee_cents: i64,
    pub min_nights: i32,
    pub max_nights: i32,
}

/// Quote the total for a stay of `nights` nights plus the prices of the
/// selected additional services.
///
/// `total = price_per_night * nights + cleaning_fee + sum(services)`.
/// Fails with [`CoreError::InvalidNights`] when the duration falls
/// outside the property's `[min_nights, max_nights]`.
pub fn quote_total_cents(
    pricing: &StayPricing,
    nights: i64,
    service_prices_cents: &[i64],
) -> Result<i64, CoreError> {
    if nights < i64::from(pricing.min_nights) || nights > i64::from(pricing.max_nights) {
        return Err(CoreError::InvalidNights {
            nights,
            min_nights: pricing.min_nights,
            max_nights: pricing.max_nights,
        });
    }

    let services: i64 = service_prices_cents.iter().sum();
    Ok(pricing.price_per_night_cents * nights + pricing.cleaning_fee_cents + services)
}
