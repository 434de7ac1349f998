//! User entity model and DTOs.

use lodgia_core::roles::Role;
use lodgia_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// Role name from the closed set; parse with [`Role::parse`].
    pub user_type: String,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The user's role. Falls back to `Traveler` if the stored name is
    /// somehow outside the closed set (the CHECK constraint prevents
    /// this for rows written by this codebase).
    pub fn role(&self) -> Role {
        Role::parse(&self.user_type).unwrap_or(Role::Traveler)
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub user_type: String,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            user_type: user.user_type,
            profile_image: user.profile_image,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// DTO for inserting a new user (password already hashed).
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub user_type: Role,
}

/// DTO for updating an existing user's profile. All fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
}
