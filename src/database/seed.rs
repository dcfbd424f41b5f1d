use chrono::{Duration, NaiveDate};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::auth::{self, AuthError};
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, TaskChanges};
use crate::database::{ProjectRepository, TaskRepository, UserRepository};
use crate::types::{Role, TaskState};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Sample record missing: {0}")]
    MissingSampleRecord(String),
}

/// Sample accounts as (username, email, password)
pub const SAMPLE_USERS: [(&str, &str, &str); 2] = [
    ("erika.muster", "erika@example.com", "password123"),
    ("max.power", "max@example.com", "password456"),
];

pub const SAMPLE_PROJECT: &str = "p1";

/// Fill empty tables with sample users, a project and three tasks.
/// Tables that already hold rows are left alone.
pub async fn seed_sample_data(pool: &PgPool, bcrypt_cost: u32, today: NaiveDate) -> Result<(), SeedError> {
    let users = UserRepository::new(pool.clone());
    let projects = ProjectRepository::new(pool.clone());
    let tasks = TaskRepository::new(pool.clone());

    info!("Starting sample data initialization");

    if users.count().await? == 0 {
        for (username, email, password) in SAMPLE_USERS {
            let password_hash = auth::hash_password(password.to_string(), bcrypt_cost).await?;
            users
                .insert(NewUser {
                    username: username.to_string(),
                    email: email.to_string(),
                    password_hash,
                    role: Role::User,
                })
                .await?;
        }
        info!(count = SAMPLE_USERS.len(), "Sample users created");
    } else {
        info!("Users already exist, skipping user creation");
    }

    if projects.count().await? == 0 {
        projects.insert(SAMPLE_PROJECT).await?;
        info!(name = SAMPLE_PROJECT, "Sample project created");
    }

    if tasks.count().await? == 0 {
        let erika = find_user(&users, SAMPLE_USERS[0].0).await?;
        let max = find_user(&users, SAMPLE_USERS[1].0).await?;
        let project = projects
            .find_by_name(SAMPLE_PROJECT)
            .await?
            .ok_or_else(|| SeedError::MissingSampleRecord(SAMPLE_PROJECT.to_string()))?;

        let samples = [
            (
                TaskChanges {
                    title: "Spring Boot lernen".to_string(),
                    description: Some(
                        "Die Grundlagen von Spring Boot und Spring Data JPA verstehen.".to_string(),
                    ),
                    state: TaskState::Open,
                    due_date: Some(today + Duration::days(1)),
                    assigned_to_user_id: None,
                },
                erika,
            ),
            (
                TaskChanges {
                    title: "API mit Security absichern".to_string(),
                    description: Some(
                        "Einfache Authentifizierung mit Usern aus der DB implementieren.".to_string(),
                    ),
                    state: TaskState::InProgress,
                    due_date: Some(today + Duration::days(2)),
                    assigned_to_user_id: Some(max),
                },
                erika,
            ),
            (
                TaskChanges {
                    title: "Frontend entwerfen".to_string(),
                    description: Some("Ein Mockup für das React/Angular Frontend erstellen.".to_string()),
                    state: TaskState::Open,
                    due_date: Some(today + Duration::days(10)),
                    assigned_to_user_id: Some(erika),
                },
                max,
            ),
        ];

        for (changes, reporter_id) in &samples {
            tasks.insert(changes, *reporter_id, project.id).await?;
        }
        info!(count = samples.len(), "Sample tasks created");
    } else {
        info!("Tasks already exist, skipping task creation");
    }

    info!("Sample data initialization finished");
    Ok(())
}

async fn find_user(users: &UserRepository, username: &str) -> Result<i64, SeedError> {
    users
        .find_by_username(username)
        .await?
        .map(|u| u.id)
        .ok_or_else(|| SeedError::MissingSampleRecord(username.to_string()))
}
