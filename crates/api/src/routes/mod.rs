pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod host_profile;
pub mod property;
pub mod reservation;
pub mod review;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                          register (public)
/// /auth/login                           login (public)
/// /auth/refresh                         refresh (public)
/// /auth/logout                          logout (requires auth)
/// /auth/me                              current user (GET), update profile (PUT)
///
/// /admin/users                          list accounts (admin)
/// /admin/users/{id}/deactivate          deactivate account (admin)
///
/// /properties                           search, create
/// /properties/{id}                      get, update, deactivate
/// /properties/{id}/availability         availability probe (GET)
/// /properties/{id}/services             list, add
/// /properties/{id}/reservations         owner calendar (GET)
/// /properties/{id}/reviews              list reviews (GET)
///
/// /reservations                         book (POST)
/// /reservations/mine                    guest's bookings (GET)
/// /reservations/{id}                    get
/// /reservations/{id}/services           booked services (GET)
/// /reservations/{id}/confirm            owner/admin confirms (POST)
/// /reservations/{id}/cancel             guest/owner/admin cancels (POST)
/// /reservations/{id}/complete           admin completes (POST)
///
/// /reviews                              post review (POST)
///
/// /host-profiles                        onboard (POST)
/// /host-profiles/me                     own profile (GET)
/// /host-profiles/verified               verified hosts (GET, public)
/// /host-profiles/{id}                   update (PUT)
/// /host-profiles/{id}/verify            admin verifies (POST)
///
/// /dashboard                            role-based dashboard (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/properties", property::router())
        .nest("/reservations", reservation::router())
        .nest("/reviews", review::router())
        .nest("/host-profiles", host_profile::router())
        .nest("/dashboard", dashboard::router())
}
