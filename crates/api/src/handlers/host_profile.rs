//! Handlers for the `/host-profiles` resource (host/provider
//! onboarding and admin verification).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lodgia_core::error::CoreError;
use lodgia_core::roles::Role;
use lodgia_core::types::DbId;
use lodgia_db::models::host_profile::{CreateHostProfile, HostProfile, UpdateHostProfile};
use lodgia_db::repositories::HostProfileRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::ensure_owns;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

/// POST /api/v1/host-profiles
///
/// Start hosting: create the onboarding profile for the authenticated
/// owner/provider. One profile per user.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateHostProfile>,
) -> AppResult<(StatusCode, Json<HostProfile>)> {
    if user.role == Role::Traveler {
        return Err(AppError::Core(CoreError::Forbidden(
            "Traveler accounts cannot onboard as hosts".into(),
        )));
    }
    if !(0..=10_000).contains(&input.commission_rate_bps) {
        return Err(AppError::Core(CoreError::Validation(
            "commission_rate_bps must be between 0 and 10000".into(),
        )));
    }

    // A second profile fails on uq_host_profiles_user and surfaces as 409.
    let profile = HostProfileRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(profile_id = profile.id, user_id = user.user_id, "Host profile created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/v1/host-profiles/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<HostProfile>> {
    let profile = HostProfileRepo::find_by_user(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "HostProfile",
            id: user.user_id,
        }))?;
    Ok(Json(profile))
}

/// GET /api/v1/host-profiles/verified
///
/// Public directory of verified hosts.
pub async fn list_verified(State(state): State<AppState>) -> AppResult<Json<Vec<HostProfile>>> {
    let profiles = HostProfileRepo::list_verified(&state.pool).await?;
    Ok(Json(profiles))
}

/// PUT /api/v1/host-profiles/{id}
///
/// Update a profile. Only its user (or an admin) may mutate it;
/// verification is untouchable here.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHostProfile>,
) -> AppResult<Json<HostProfile>> {
    let profile = HostProfileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "HostProfile",
            id,
        }))?;
    ensure_owns(&user, profile.user_id, "host profile")?;

    let updated = HostProfileRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "HostProfile",
            id,
        }))?;
    Ok(Json(updated))
}

/// POST /api/v1/host-profiles/{id}/verify
///
/// Admin marks a host profile verified.
pub async fn verify(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<HostProfile>> {
    let profile = HostProfileRepo::set_verified(&state.pool, id, true)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "HostProfile",
            id,
        }))?;
    tracing::info!(profile_id = id, "Host profile verified");
    Ok(Json(profile))
}
