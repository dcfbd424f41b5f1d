use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use super::project::Project;
use super::user::UserProfile;
use crate::database::manager::DatabaseError;
use crate::types::{Role, TaskState};

/// A task with its reporter, assignee and project resolved
#[derive(Debug, Clone)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub state: TaskState,
    pub due_date: Option<NaiveDate>,
    pub reported_by: UserProfile,
    pub assigned_to: Option<UserProfile>,
    pub belongs_to: Project,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values written by insert and update
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub title: String,
    pub description: Option<String>,
    pub state: TaskState,
    pub due_date: Option<NaiveDate>,
    pub assigned_to_user_id: Option<i64>,
}

/// Flat row produced by the task join query
#[derive(Debug, FromRow)]
pub(crate) struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub state: String,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub reporter_id: i64,
    pub reporter_username: String,
    pub reporter_email: String,
    pub reporter_role: String,
    pub reporter_created_at: DateTime<Utc>,
    pub reporter_updated_at: DateTime<Utc>,

    pub assignee_id: Option<i64>,
    pub assignee_username: Option<String>,
    pub assignee_email: Option<String>,
    pub assignee_role: Option<String>,
    pub assignee_created_at: Option<DateTime<Utc>>,
    pub assignee_updated_at: Option<DateTime<Utc>>,

    pub project_id: i64,
    pub project_name: String,
    pub project_created_at: DateTime<Utc>,
    pub project_updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = DatabaseError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let state = row
            .state
            .parse::<TaskState>()
            .map_err(|e| DatabaseError::CorruptRow(format!("task {}: {}", row.id, e)))?;

        let reported_by = UserProfile {
            id: row.reporter_id,
            username: row.reporter_username,
            email: row.reporter_email,
            role: row.reporter_role.parse().unwrap_or_default(),
            created_at: row.reporter_created_at,
            updated_at: row.reporter_updated_at,
        };

        let assigned_to = match (
            row.assignee_id,
            row.assignee_username,
            row.assignee_email,
            row.assignee_created_at,
            row.assignee_updated_at,
        ) {
            (Some(id), Some(username), Some(email), Some(created_at), Some(updated_at)) => {
                Some(UserProfile {
                    id,
                    username,
                    email,
                    role: row
                        .assignee_role
                        .as_deref()
                        .and_then(|r| r.parse::<Role>().ok())
                        .unwrap_or_default(),
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            state,
            due_date: row.due_date,
            reported_by,
            assigned_to,
            belongs_to: Project {
                id: row.project_id,
                name: row.project_name,
                created_at: row.project_created_at,
                updated_at: row.project_updated_at,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
