//! Route definitions for the `/dashboard` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET / -> get (payload dispatched on the caller's role)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard::get))
}
