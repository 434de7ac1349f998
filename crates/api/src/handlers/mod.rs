pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod host_profile;
pub mod property;
pub mod reservation;
pub mod review;
