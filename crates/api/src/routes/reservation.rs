//! Route definitions for the `/reservations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reservation;
use crate::state::AppState;

/// Routes mounted at `/reservations`.
///
/// ```text
/// POST /               -> create (book a stay)
/// GET  /mine           -> mine (guest's bookings)
/// GET  /{id}           -> get_by_id (guest, property owner, admin)
/// GET  /{id}/services  -> list_services
/// POST /{id}/confirm   -> confirm (property owner or admin)
/// POST /{id}/cancel    -> cancel (guest, property owner, admin)
/// POST /{id}/complete  -> complete (admin, after check-out)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(reservation::create))
        .route("/mine", get(reservation::mine))
        .route("/{id}", get(reservation::get_by_id))
        .route("/{id}/services", get(reservation::list_services))
        .route("/{id}/confirm", post(reservation::confirm))
        .route("/{id}/cancel", post(reservation::cancel))
        .route("/{id}/complete", post(reservation::complete))
}
