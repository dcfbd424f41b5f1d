//! Shared domain enums used by persistence, DTOs and seeding

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Lifecycle state of a task. Stored and serialized by its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TaskState {
    Created,
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

impl TaskState {
    pub const ALL: [TaskState; 5] = [
        TaskState::Created,
        TaskState::Open,
        TaskState::InProgress,
        TaskState::Resolved,
        TaskState::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Created => "Created",
            TaskState::Open => "Open",
            TaskState::InProgress => "In Progress",
            TaskState::Resolved => "Resolved",
            TaskState::Closed => "Closed",
        }
    }
}

impl Default for TaskState {
    fn default() -> Self {
        TaskState::Open
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| format!("Unknown task state '{}'", s))
    }
}

/// Authority granted to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_USER" => Ok(Role::User),
            "ROLE_ADMIN" => Ok(Role::Admin),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}
