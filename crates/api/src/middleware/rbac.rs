//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role
//! does not meet the minimum requirement. Use these in route handlers
//! to enforce authorization at the type level. Relationship checks
//! (e.g. "owner of this listing") stay in the handlers, on top of the
//! role gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lodgia_core::error::CoreError;
use lodgia_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires a role that may host listings (`owner` or `admin`).
/// Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn owner_or_admin(RequireHost(user): RequireHost) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireHost(pub AuthUser);

impl FromRequestParts<AppState> for RequireHost {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.can_host() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Owner or Admin role required".into(),
            )));
        }
        Ok(RequireHost(user))
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for use
/// in route definitions where the intent "this route requires
/// authentication" should be self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
