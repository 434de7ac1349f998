//! Route definitions for the `/host-profiles` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::host_profile;
use crate::state::AppState;

/// Routes mounted at `/host-profiles`.
///
/// ```text
/// POST /              -> create (owner/provider onboarding)
/// GET  /me            -> me
/// GET  /verified      -> list_verified (public)
/// PUT  /{id}          -> update (own profile or admin)
/// POST /{id}/verify   -> verify (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(host_profile::create))
        .route("/me", get(host_profile::me))
        .route("/verified", get(host_profile::list_verified))
        .route("/{id}", put(host_profile::update))
        .route("/{id}/verify", post(host_profile::verify))
}
