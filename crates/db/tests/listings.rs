//! Integration tests for listing search, soft-deactivation, reviews,
//! and owner statistics.

use chrono::NaiveDate;
use lodgia_core::roles::Role;
use lodgia_db::models::property::{CreateProperty, PropertyFilter};
use lodgia_db::models::reservation::CreateReservation;
use lodgia_db::models::review::CreateReview;
use lodgia_db::models::user::CreateUser;
use lodgia_db::repositories::{PropertyRepo, ReservationRepo, ReviewRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_user(email: &str, role: Role) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$fake".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        phone: "+212600000000".to_string(),
        user_type: role,
    }
}

fn new_property(title: &str, neighborhood: &str, price_cents: i64) -> CreateProperty {
    CreateProperty {
        title: title.to_string(),
        description: "A place to stay".to_string(),
        property_type: "apartment".to_string(),
        address: "1 Main St".to_string(),
        surface_m2: 60,
        max_guests: 4,
        bedrooms: 2,
        bathrooms: 1,
        beds: 2,
        price_per_night_cents: price_cents,
        cleaning_fee_cents: 15_00,
        min_nights: 1,
        max_nights: 30,
        amenities: vec!["wifi".to_string()],
        images: vec![],
        rules: vec![],
        cancellation_policy: "flexible".to_string(),
        check_in_time: "15:00".to_string(),
        check_out_time: "11:00".to_string(),
        category: "standard".to_string(),
        neighborhood: neighborhood.to_string(),
        beach_access: false,
    }
}

async fn seed_owner(pool: &PgPool) -> i64 {
    UserRepo::create(pool, &new_user("owner@test.com", Role::Owner))
        .await
        .expect("owner creation should succeed")
        .id
}

// ---------------------------------------------------------------------------
// Search filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn search_with_no_filters_returns_active_listings(pool: PgPool) {
    let owner_id = seed_owner(&pool).await;
    PropertyRepo::create(&pool, owner_id, &new_property("A", "north", 80_00))
        .await
        .unwrap();
    PropertyRepo::create(&pool, owner_id, &new_property("B", "south", 120_00))
        .await
        .unwrap();

    let results = PropertyRepo::search(&pool, &PropertyFilter::default())
        .await
        .expect("search should succeed");
    assert_eq!(results.len(), 2);
    // Unreviewed listings report a zero rating, not NULL.
    assert!(results.iter().all(|p| p.rating == 0.0 && p.reviews_count == 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn search_filters_by_price_range_and_neighborhood(pool: PgPool) {
    let owner_id = seed_owner(&pool).await;
    PropertyRepo::create(&pool, owner_id, &new_property("Cheap", "north", 50_00))
        .await
        .unwrap();
    let mid = PropertyRepo::create(&pool, owner_id, &new_property("Mid", "north", 100_00))
        .await
        .unwrap();
    PropertyRepo::create(&pool, owner_id, &new_property("Pricey", "south", 300_00))
        .await
        .unwrap();

    let filter = PropertyFilter {
        neighborhood: Some("north".to_string()),
        min_price_cents: Some(80_00),
        max_price_cents: Some(200_00),
        ..Default::default()
    };
    let results = PropertyRepo::search(&pool, &filter).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].property.id, mid.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn search_requires_every_requested_amenity(pool: PgPool) {
    let owner_id = seed_owner(&pool).await;
    let mut well_equipped = new_property("Equipped", "north", 90_00);
    well_equipped.amenities = vec!["wifi".to_string(), "pool".to_string(), "parking".to_string()];
    let equipped = PropertyRepo::create(&pool, owner_id, &well_equipped).await.unwrap();
    PropertyRepo::create(&pool, owner_id, &new_property("Basic", "north", 70_00))
        .await
        .unwrap();

    let filter = PropertyFilter {
        amenities: Some(vec!["wifi".to_string(), "pool".to_string()]),
        ..Default::default()
    };
    let results = PropertyRepo::search(&pool, &filter).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].property.id, equipped.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn deactivated_listing_disappears_from_search(pool: PgPool) {
    let owner_id = seed_owner(&pool).await;
    let property = PropertyRepo::create(&pool, owner_id, &new_property("A", "north", 80_00))
        .await
        .unwrap();

    assert!(PropertyRepo::deactivate(&pool, property.id).await.unwrap());
    // Deactivating twice is a no-op.
    assert!(!PropertyRepo::deactivate(&pool, property.id).await.unwrap());

    let results = PropertyRepo::search(&pool, &PropertyFilter::default())
        .await
        .unwrap();
    assert!(results.is_empty());

    // The row itself survives for reservation history.
    let stored = PropertyRepo::find_by_id(&pool, property.id).await.unwrap();
    assert!(stored.is_some_and(|p| !p.is_active));
}

#[sqlx::test(migrations = "./migrations")]
async fn night_bounds_check_rejects_min_above_max(pool: PgPool) {
    let owner_id = seed_owner(&pool).await;
    let mut bad = new_property("Broken", "north", 80_00);
    bad.min_nights = 10;
    bad.max_nights = 3;

    let err = PropertyRepo::create(&pool, owner_id, &bad)
        .await
        .expect_err("min_nights > max_nights must violate the CHECK");
    assert!(matches!(err, sqlx::Error::Database(_)));
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Book, confirm, and complete a stay so it becomes reviewable.
async fn completed_stay(pool: &PgPool, property_id: i64, guest_id: i64, month: u32) -> i64 {
    let input = CreateReservation {
        property_id,
        guest_id,
        check_in: date(2024, month, 1),
        check_out: date(2024, month, 4),
        adults: 2,
        children: 0,
        infants: 0,
        pets: 0,
        total_amount_cents: 255_00,
        payment_method: "card".to_string(),
        special_requests: None,
        idempotency_key: None,
    };
    let reservation = ReservationRepo::create(pool, &input, &[]).await.unwrap();
    ReservationRepo::confirm(pool, reservation.id).await.unwrap();
    ReservationRepo::complete(pool, reservation.id).await.unwrap();
    reservation.id
}

#[sqlx::test(migrations = "./migrations")]
async fn one_review_per_reservation(pool: PgPool) {
    let owner_id = seed_owner(&pool).await;
    let guest = UserRepo::create(&pool, &new_user("guest@test.com", Role::Traveler))
        .await
        .unwrap();
    let property = PropertyRepo::create(&pool, owner_id, &new_property("A", "north", 80_00))
        .await
        .unwrap();
    let reservation_id = completed_stay(&pool, property.id, guest.id, 6).await;

    let review = CreateReview {
        reservation_id,
        property_id: property.id,
        guest_id: guest.id,
        rating: 5,
        comment: "Great stay".to_string(),
    };
    ReviewRepo::create(&pool, &review).await.expect("first review should succeed");

    let err = ReviewRepo::create(&pool, &review)
        .await
        .expect_err("a second review for the same stay must fail");
    assert!(lodgia_db::is_unique_violation(&err, "uq_reviews_reservation"));
}

#[sqlx::test(migrations = "./migrations")]
async fn review_aggregate_shows_up_in_search(pool: PgPool) {
    let owner_id = seed_owner(&pool).await;
    let guest = UserRepo::create(&pool, &new_user("guest@test.com", Role::Traveler))
        .await
        .unwrap();
    let property = PropertyRepo::create(&pool, owner_id, &new_property("A", "north", 80_00))
        .await
        .unwrap();

    for (month, rating) in [(6, 4), (7, 2)] {
        let reservation_id = completed_stay(&pool, property.id, guest.id, month).await;
        ReviewRepo::create(
            &pool,
            &CreateReview {
                reservation_id,
                property_id: property.id,
                guest_id: guest.id,
                rating,
                comment: "ok".to_string(),
            },
        )
        .await
        .unwrap();
    }

    let results = PropertyRepo::search(&pool, &PropertyFilter::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].reviews_count, 2);
    assert!((results[0].rating - 3.0).abs() < f64::EPSILON);

    // A min_rating filter above the average hides the listing.
    let strict = PropertyFilter {
        min_rating: Some(3.5),
        ..Default::default()
    };
    assert!(PropertyRepo::search(&pool, &strict).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Owner stats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn owner_stats_aggregate_across_properties(pool: PgPool) {
    let owner_id = seed_owner(&pool).await;
    let guest = UserRepo::create(&pool, &new_user("guest@test.com", Role::Traveler))
        .await
        .unwrap();
    let first = PropertyRepo::create(&pool, owner_id, &new_property("A", "north", 80_00))
        .await
        .unwrap();
    let second = PropertyRepo::create(&pool, owner_id, &new_property("B", "south", 90_00))
        .await
        .unwrap();

    let booking = |property_id, month| CreateReservation {
        property_id,
        guest_id: guest.id,
        check_in: date(2024, month, 1),
        check_out: date(2024, month, 4),
        adults: 1,
        children: 0,
        infants: 0,
        pets: 0,
        total_amount_cents: 100_00,
        payment_method: "card".to_string(),
        special_requests: None,
        idempotency_key: None,
    };

    // One confirmed, one completed, one cancelled, one left pending.
    let confirmed = ReservationRepo::create(&pool, &booking(first.id, 6), &[]).await.unwrap();
    ReservationRepo::confirm(&pool, confirmed.id).await.unwrap();

    let completed = ReservationRepo::create(&pool, &booking(second.id, 6), &[]).await.unwrap();
    ReservationRepo::confirm(&pool, completed.id).await.unwrap();
    ReservationRepo::complete(&pool, completed.id).await.unwrap();

    let cancelled = ReservationRepo::create(&pool, &booking(first.id, 7), &[]).await.unwrap();
    ReservationRepo::cancel(&pool, cancelled.id).await.unwrap();

    ReservationRepo::create(&pool, &booking(second.id, 7), &[]).await.unwrap();

    let stats = ReservationRepo::owner_stats(&pool, owner_id).await.unwrap();
    assert_eq!(stats.total_reservations, 4);
    assert_eq!(stats.pending_reservations, 1);
    assert_eq!(stats.confirmed_reservations, 1);
    assert_eq!(stats.completed_reservations, 1);
    assert_eq!(stats.cancelled_reservations, 1);
    // Revenue counts confirmed + completed only.
    assert_eq!(stats.total_revenue_cents, 200_00);
}
