//! Route definitions for the `/properties` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::property;
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// ```text
/// GET    /                     -> list (public search)
/// POST   /                     -> create (owner/admin)
/// GET    /{id}                 -> get_by_id
/// PUT    /{id}                 -> update (owner of the row or admin)
/// DELETE /{id}                 -> delete (soft-deactivate)
/// GET    /{id}/availability    -> availability probe
/// GET    /{id}/services        -> list_services
/// POST   /{id}/services        -> add_service (owner of the row or admin)
/// GET    /{id}/reservations    -> list_reservations (owner of the row or admin)
/// GET    /{id}/reviews         -> list_reviews
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(property::list).post(property::create))
        .route(
            "/{id}",
            get(property::get_by_id)
                .put(property::update)
                .delete(property::delete),
        )
        .route("/{id}/availability", get(property::availability))
        .route(
            "/{id}/services",
            get(property::list_services).post(property::add_service),
        )
        .route("/{id}/reservations", get(property::list_reservations))
        .route("/{id}/reviews", get(property::list_reviews))
}
