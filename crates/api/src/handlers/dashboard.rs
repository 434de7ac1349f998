//! The role-based dashboard.
//!
//! One endpoint, one exhaustive `match` over the closed role set; each
//! role gets its own payload variant, tagged by role name in the JSON.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use lodgia_core::lifecycle::ReservationStatus;
use lodgia_core::roles::Role;
use lodgia_db::models::reservation::{OwnerStats, Reservation};
use lodgia_db::repositories::{HostProfileRepo, PropertyRepo, ReservationRepo, UserRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// Per-role dashboard payload.
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum DashboardResponse {
    /// Platform-wide counters.
    Admin {
        users: i64,
        active_properties: i64,
        reservations: i64,
    },
    /// The owner's portfolio and booking statistics.
    Owner {
        properties: i64,
        stats: OwnerStats,
    },
    /// The traveler's upcoming (active, not yet checked-in) stays.
    Traveler {
        upcoming_stays: Vec<Reservation>,
    },
    /// Onboarding progress for service providers.
    Provider {
        onboarded: bool,
        verified: bool,
    },
}

/// GET /api/v1/dashboard
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DashboardResponse>> {
    let response = match user.role {
        Role::Admin => DashboardResponse::Admin {
            users: UserRepo::count(&state.pool).await?,
            active_properties: PropertyRepo::count_active(&state.pool).await?,
            reservations: ReservationRepo::count(&state.pool).await?,
        },
        Role::Owner => DashboardResponse::Owner {
            properties: PropertyRepo::list_by_owner(&state.pool, user.user_id)
                .await?
                .len() as i64,
            stats: ReservationRepo::owner_stats(&state.pool, user.user_id).await?,
        },
        Role::Traveler => {
            let today = Utc::now().date_naive();
            let upcoming_stays = ReservationRepo::list_by_guest(&state.pool, user.user_id)
                .await?
                .into_iter()
                .filter(|r| {
                    r.check_in >= today
                        && r.status().is_some_and(ReservationStatus::blocks_calendar)
                })
                .collect();
            DashboardResponse::Traveler { upcoming_stays }
        }
        Role::Provider => {
            let profile = HostProfileRepo::find_by_user(&state.pool, user.user_id).await?;
            DashboardResponse::Provider {
                onboarded: profile.is_some(),
                verified: profile.is_some_and(|p| p.is_verified),
            }
        }
    };
    Ok(Json(response))
}
