//! HTTP-level integration tests for the booking flow: the availability
//! probe, reservation creation with derived totals, idempotent replay,
//! lifecycle transitions, and reviews.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, get_auth, post_auth, post_json, post_json_auth};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Register via the API; returns (access_token, user_id).
async fn signup(pool: &PgPool, email: &str, user_type: &str) -> (String, i64) {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "email": email,
        "password": "test_password_123!",
        "first_name": "Test",
        "last_name": "User",
        "phone": "+212600000000",
        "user_type": user_type,
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["access_token"].as_str().unwrap().to_string(),
        json["user"]["id"].as_i64().unwrap(),
    )
}

/// Promote an account to admin directly in the database (admin signup
/// is forbidden through the API).
async fn make_admin(pool: &PgPool, user_id: i64) {
    sqlx::query("UPDATE users SET user_type = 'admin' WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .expect("role update should succeed");
}

/// Create a listing via the API; returns its id.
///
/// 100.00/night, 20.00 cleaning fee, 2..=14 nights -- the worked
/// pricing example.
async fn create_property(pool: &PgPool, owner_token: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "title": "Seaview flat",
        "description": "Two-bedroom flat near the beach",
        "property_type": "apartment",
        "address": "12 Rue des Palmiers",
        "surface_m2": 80,
        "max_guests": 4,
        "bedrooms": 2,
        "bathrooms": 1,
        "beds": 3,
        "price_per_night_cents": 10000,
        "cleaning_fee_cents": 2000,
        "min_nights": 2,
        "max_nights": 14,
        "amenities": ["wifi", "kitchen"],
        "images": [],
        "rules": [],
        "cancellation_policy": "flexible",
        "check_in_time": "15:00",
        "check_out_time": "11:00",
        "category": "standard",
        "neighborhood": "oceanfront",
        "beach_access": true,
    });
    let response = post_json_auth(app, "/api/v1/properties", owner_token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

fn booking_body(property_id: i64, check_in: &str, check_out: &str) -> serde_json::Value {
    serde_json::json!({
        "property_id": property_id,
        "check_in": check_in,
        "check_out": check_out,
        "adults": 2,
        "payment_method": "card",
    })
}

/// Book a stay via the API, asserting 201; returns the reservation JSON.
async fn book(
    pool: &PgPool,
    guest_token: &str,
    property_id: i64,
    check_in: &str,
    check_out: &str,
) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/reservations",
        guest_token,
        booking_body(property_id, check_in, check_out),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Availability probe
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn availability_is_true_on_an_empty_calendar(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let property_id = create_property(&pool, &owner_token).await;

    let app = common::build_test_app(pool);
    let uri = format!(
        "/api/v1/properties/{property_id}/availability?check_in=2024-06-01&check_out=2024-06-04"
    );
    let response = common::get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["available"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn availability_rejects_an_inverted_range(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let property_id = create_property(&pool, &owner_token).await;

    let app = common::build_test_app(pool);
    let uri = format!(
        "/api/v1/properties/{property_id}/availability?check_in=2024-06-04&check_out=2024-06-01"
    );
    let response = common::get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_matches!(body_json(response).await["code"].as_str(), Some("INVALID_RANGE"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn availability_honours_the_half_open_rule(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    book(&pool, &guest_token, property_id, "2024-06-01", "2024-06-05").await;

    // Touching endpoints: available.
    let app = common::build_test_app(pool.clone());
    let uri = format!(
        "/api/v1/properties/{property_id}/availability?check_in=2024-06-05&check_out=2024-06-08"
    );
    assert_eq!(body_json(common::get(app, &uri).await).await["available"], true);

    // Straddling overlap: unavailable.
    let app = common::build_test_app(pool);
    let uri = format!(
        "/api/v1/properties/{property_id}/availability?check_in=2024-06-04&check_out=2024-06-06"
    );
    assert_eq!(body_json(common::get(app, &uri).await).await["available"], false);
}

// ---------------------------------------------------------------------------
// Booking creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn booking_derives_the_total_server_side(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, guest_id) = signup(&pool, "guest@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    let json = book(&pool, &guest_token, property_id, "2024-06-01", "2024-06-04").await;

    // 3 nights * 100.00 + 20.00 cleaning = 320.00.
    assert_eq!(json["total_amount_cents"], 32000);
    assert_eq!(json["status"], "pending");
    assert_eq!(json["payment_status"], "pending");
    assert_eq!(json["guest_id"], guest_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn booking_adds_selected_service_prices(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/properties/{property_id}/services"),
        &owner_token,
        serde_json::json!({ "name": "airport transfer", "price_cents": 3500 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let service_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let mut body = booking_body(property_id, "2024-06-01", "2024-06-04");
    body["service_ids"] = serde_json::json!([service_id]);
    let response = post_json_auth(app, "/api/v1/reservations", &guest_token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["total_amount_cents"], 35500);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn booking_rejects_a_stay_below_min_nights(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/reservations",
        &guest_token,
        booking_body(property_id, "2024-06-01", "2024-06-02"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_matches!(body_json(response).await["code"].as_str(), Some("INVALID_NIGHTS"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn booking_an_overlapping_range_is_a_conflict(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    book(&pool, &guest_token, property_id, "2024-06-01", "2024-06-05").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/reservations",
        &guest_token,
        booking_body(property_id, "2024-06-04", "2024-06-06"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_matches!(
        body_json(response).await["code"].as_str(),
        Some("RANGE_UNAVAILABLE")
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn replaying_an_idempotency_key_returns_the_original(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    let key = Uuid::new_v4();
    let mut body = booking_body(property_id, "2024-06-01", "2024-06-04");
    body["idempotency_key"] = serde_json::json!(key);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/reservations", &guest_token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = body_json(response).await;

    // Same key, replayed after a (simulated) timeout: 200, same row.
    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/reservations", &guest_token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let replay = body_json(response).await;
    assert_eq!(replay["id"], first["id"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn booking_an_unknown_property_is_not_found(pool: PgPool) {
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/reservations",
        &guest_token,
        booking_body(999, "2024-06-01", "2024-06-04"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Lifecycle over HTTP
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_confirms_and_payment_settles(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    let reservation = book(&pool, &guest_token, property_id, "2024-06-01", "2024-06-04").await;
    let id = reservation["id"].as_i64().unwrap();

    // The guest cannot confirm their own stay.
    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/reservations/{id}/confirm"), &guest_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = post_auth(app, &format!("/api/v1/reservations/{id}/confirm"), &owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let confirmed = body_json(response).await;
    assert_eq!(confirmed["status"], "confirmed");
    assert_eq!(confirmed["payment_status"], "paid");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn guest_cancels_and_is_refunded_atomically(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    let reservation = book(&pool, &guest_token, property_id, "2024-06-01", "2024-06-04").await;
    let id = reservation["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = post_auth(app, &format!("/api/v1/reservations/{id}/cancel"), &guest_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cancelled = body_json(response).await;
    assert_eq!(cancelled["status"], "cancelled");
    assert_eq!(cancelled["payment_status"], "refunded");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn a_stranger_cannot_cancel_someone_elses_stay(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let (stranger_token, _) = signup(&pool, "stranger@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    let reservation = book(&pool, &guest_token, property_id, "2024-06-01", "2024-06-04").await;
    let id = reservation["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response =
        post_auth(app, &format!("/api/v1/reservations/{id}/cancel"), &stranger_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelling_twice_is_an_invalid_transition(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    let reservation = book(&pool, &guest_token, property_id, "2024-06-01", "2024-06-04").await;
    let id = reservation["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_auth(app, &format!("/api/v1/reservations/{id}/cancel"), &guest_token).await;

    let app = common::build_test_app(pool);
    let response = post_auth(app, &format!("/api/v1/reservations/{id}/cancel"), &guest_token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_matches!(
        body_json(response).await["code"].as_str(),
        Some("INVALID_TRANSITION")
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_completes_a_past_confirmed_stay(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let (_, admin_id) = signup(&pool, "admin@test.com", "provider").await;
    make_admin(&pool, admin_id).await;
    // Tokens embed the role, so mint a fresh one post-promotion.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "admin@test.com", "password": "test_password_123!" }),
    )
    .await;
    let admin_token = body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let property_id = create_property(&pool, &owner_token).await;

    // A stay that ended long ago.
    let reservation = book(&pool, &guest_token, property_id, "2024-06-01", "2024-06-04").await;
    let id = reservation["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_auth(app, &format!("/api/v1/reservations/{id}/confirm"), &owner_token).await;

    // Completion is admin-only.
    let app = common::build_test_app(pool.clone());
    let response =
        post_auth(app, &format!("/api/v1/reservations/{id}/complete"), &owner_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = post_auth(app, &format!("/api/v1/reservations/{id}/complete"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "completed");
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn only_completed_stays_can_be_reviewed(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    let reservation = book(&pool, &guest_token, property_id, "2024-06-01", "2024-06-04").await;
    let id = reservation["id"].as_i64().unwrap();

    let review = serde_json::json!({
        "reservation_id": id,
        "rating": 5,
        "comment": "Lovely place",
    });

    // Still pending: rejected.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/reviews", &guest_token, review.clone()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Confirm + complete directly in the database, then review.
    sqlx::query("UPDATE reservations SET status = 'completed', payment_status = 'paid' WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/reviews", &guest_token, review.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // One review per stay.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/reviews", &guest_token, review).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The review shows up on the property.
    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/properties/{property_id}/reviews"),
        &guest_token,
    )
    .await;
    let reviews = body_json(response).await;
    assert_eq!(reviews.as_array().unwrap().len(), 1);
    assert_eq!(reviews[0]["rating"], 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rating_outside_one_to_five_is_rejected(pool: PgPool) {
    let (owner_token, _) = signup(&pool, "owner@test.com", "owner").await;
    let (guest_token, _) = signup(&pool, "guest@test.com", "traveler").await;
    let property_id = create_property(&pool, &owner_token).await;

    let reservation = book(&pool, &guest_token, property_id, "2024-06-01", "2024-06-04").await;
    let id = reservation["id"].as_i64().unwrap();
    sqlx::query("UPDATE reservations SET status = 'completed' WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/reviews",
        &guest_token,
        serde_json::json!({ "reservation_id": id, "rating": 6, "comment": "!" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
