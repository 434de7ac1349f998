//! Host onboarding profile models and DTOs.

use lodgia_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `host_profiles` table. One per user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HostProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub selected_package: String,
    /// Platform commission in basis points (e.g. 1500 = 15%).
    pub commission_rate_bps: i32,
    pub description: Option<String>,
    pub languages: Vec<String>,
    pub profession: Option<String>,
    pub hosting_frequency: Option<String>,
    pub accommodation_type: Option<String>,
    pub payout_method: String,
    pub is_verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a host profile during onboarding.
#[derive(Debug, Deserialize)]
pub struct CreateHostProfile {
    pub selected_package: String,
    pub commission_rate_bps: i32,
    pub description: Option<String>,
    pub languages: Vec<String>,
    pub profession: Option<String>,
    pub hosting_frequency: Option<String>,
    pub accommodation_type: Option<String>,
    pub payout_method: String,
}

/// DTO for updating a host profile. Only non-`None` fields are applied.
/// Verification is admin-only and goes through a dedicated operation.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateHostProfile {
    pub selected_package: Option<String>,
    pub description: Option<String>,
    pub languages: Option<Vec<String>>,
    pub profession: Option<String>,
    pub hosting_frequency: Option<String>,
    pub accommodation_type: Option<String>,
    pub payout_method: Option<String>,
}
