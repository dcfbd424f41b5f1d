use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::types::Role;

/// Row of the `users` table. Carries the password hash, so it is never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }
}

/// Public part of a user, as embedded in tasks and returned by the API
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        let role = user.role();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
