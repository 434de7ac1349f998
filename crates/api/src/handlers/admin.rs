//! Handlers for the `/admin/users` resource (account administration).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lodgia_core::error::CoreError;
use lodgia_core::types::DbId;
use lodgia_db::models::user::UserResponse;
use lodgia_db::repositories::{SessionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/v1/admin/users/{id}/deactivate
///
/// Soft-deactivate an account and revoke its sessions. The user's rows
/// (listings, reservations, reviews) stay intact.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot deactivate their own account".into(),
        )));
    }

    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, "Account deactivated");
    Ok(StatusCode::NO_CONTENT)
}
