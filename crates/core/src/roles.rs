//! The closed set of account roles.
//!
//! Role names must match the `user_type` CHECK constraint in
//! `20260801000001_create_users_table.sql`.

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OWNER: &str = "owner";
pub const ROLE_TRAVELER: &str = "traveler";
pub const ROLE_PROVIDER: &str = "provider";

/// Account role. The set is closed: every dispatch on role is an
/// exhaustive `match`, not a string comparison scattered per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Owner,
    Traveler,
    Provider,
}

impl Role {
    /// The stored/wire name for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Owner => ROLE_OWNER,
            Role::Traveler => ROLE_TRAVELER,
            Role::Provider => ROLE_PROVIDER,
        }
    }

    /// Parse a stored role name. Returns `None` for anything outside the
    /// closed set.
    pub fn parse(name: &str) -> Option<Role> {
        match name {
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_OWNER => Some(Role::Owner),
            ROLE_TRAVELER => Some(Role::Traveler),
            ROLE_PROVIDER => Some(Role::Provider),
            _ => None,
        }
    }

    /// Whether this role may list properties for rent.
    pub fn can_host(self) -> bool {
        matches!(self, Role::Admin | Role::Owner)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
