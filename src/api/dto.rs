//! Request and response bodies. Requests are validated field by field so the
//! client gets every problem at once; responses never carry password hashes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::hal::Relation;
use crate::database::models::{Comment, Project, Task, TaskChanges, UserProfile};
use crate::database::TaskFilter;
use crate::error::FieldErrors;
use crate::types::{Role, TaskState};

/// Checks run on a deserialized request body before it reaches a handler
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

fn not_blank(errors: &mut FieldErrors, field: &str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), message.to_string());
        return false;
    }
    true
}

fn length_between(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    message: &str,
) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.insert(field.to_string(), message.to_string());
    }
}

fn into_result(errors: FieldErrors) -> Result<(), FieldErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ---------------------------------------------------------------------------
// Auth

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        not_blank(&mut errors, "username", &self.username, "must not be blank");
        not_blank(&mut errors, "password", &self.password, "must not be blank");
        into_result(errors)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: String,
}

impl Validate for RefreshTokenRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        not_blank(&mut errors, "refreshToken", &self.refresh_token, "must not be blank");
        into_result(errors)
    }
}

// ---------------------------------------------------------------------------
// Users

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

fn validate_account(errors: &mut FieldErrors, username: &str, email: &str, password: &str) {
    if not_blank(errors, "username", username, "User name cannot be blank") {
        length_between(errors, "username", username, 3, 100, "User name must be between 3 and 100 characters");
    }
    if not_blank(errors, "email", email, "Email cannot be blank") {
        length_between(errors, "email", email, 3, 100, "Email must be between 3 and 100 characters");
    }
    if not_blank(errors, "password", password, "Password cannot be blank") {
        length_between(errors, "password", password, 3, 100, "Password must be between 3 and 100 characters");
    }
}

impl Validate for UserRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_account(&mut errors, &self.username, &self.email, &self.password);
        if not_blank(&mut errors, "role", &self.role, "Role cannot be blank") {
            if let Err(msg) = self.role.parse::<Role>() {
                errors.insert("role".to_string(), msg);
            }
        }
        into_result(errors)
    }
}

impl UserRequest {
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }
}

/// Self-service sign-up; always creates a `ROLE_USER` account
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_account(&mut errors, &self.username, &self.email, &self.password);
        into_result(errors)
    }
}

impl From<RegisterRequest> for UserRequest {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            role: Role::User.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserProfile> for UserResponse {
    fn from(user: &UserProfile) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl Relation for UserResponse {
    const COLLECTION_RELATION: &'static str = "users";
}

// ---------------------------------------------------------------------------
// Projects

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProjectRequest {
    #[serde(default)]
    pub name: String,
}

impl Validate for ProjectRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if not_blank(&mut errors, "name", &self.name, "Project name cannot be blank") {
            length_between(
                &mut errors,
                "name",
                self.name.trim(),
                3,
                100,
                "Project name must be between 3 and 100 characters",
            );
        }
        into_result(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

impl Relation for ProjectResponse {
    const COLLECTION_RELATION: &'static str = "projects";
}

// ---------------------------------------------------------------------------
// Tasks

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    #[schema(example = "In Progress")]
    pub state: String,
    pub due_date: Option<NaiveDate>,
    pub assigned_to_user_id: Option<i64>,
}

impl Validate for TaskRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if not_blank(&mut errors, "title", &self.title, "Title cannot be blank") {
            length_between(
                &mut errors,
                "title",
                &self.title,
                3,
                100,
                "Title must be between 3 and 100 characters",
            );
        }
        if let Some(description) = &self.description {
            if description.chars().count() > 1000 {
                errors.insert(
                    "description".to_string(),
                    "Description can be max 1000 characters".to_string(),
                );
            }
        }
        if not_blank(&mut errors, "state", &self.state, "State is required") {
            if let Err(msg) = self.state.parse::<TaskState>() {
                errors.insert("state".to_string(), msg);
            }
        }
        if self.due_date.is_none() {
            errors.insert("dueDate".to_string(), "Due date is required".to_string());
        }
        into_result(errors)
    }
}

impl TaskRequest {
    /// New tasks may not be due in the past; updates of overdue tasks are allowed
    pub fn validate_due_date_from(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if matches!(self.due_date, Some(due) if due < today) {
            errors.insert(
                "dueDate".to_string(),
                "Due date must be in the present or future".to_string(),
            );
        }
        into_result(errors)
    }

    /// Only meaningful after `validate` succeeded
    pub fn into_changes(self) -> TaskChanges {
        TaskChanges {
            title: self.title,
            description: self.description,
            state: self.state.parse().unwrap_or_default(),
            due_date: self.due_date,
            assigned_to_user_id: self.assigned_to_user_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub state: TaskState,
    pub due_date: Option<NaiveDate>,
    pub reported_by: UserResponse,
    pub assigned_to: Option<UserResponse>,
    pub belongs_to: ProjectResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            state: task.state,
            due_date: task.due_date,
            reported_by: UserResponse::from(&task.reported_by),
            assigned_to: task.assigned_to.as_ref().map(UserResponse::from),
            belongs_to: ProjectResponse::from(&task.belongs_to),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl Relation for TaskResponse {
    const COLLECTION_RELATION: &'static str = "tasks";
}

/// Query string of the task search endpoints
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TaskSearchParams {
    pub project_id: Option<i64>,
    pub assigned_to_user_id: Option<i64>,
    pub title: Option<String>,
}

impl From<TaskSearchParams> for TaskFilter {
    fn from(params: TaskSearchParams) -> Self {
        TaskFilter {
            project_id: params.project_id,
            assigned_to_user_id: params.assigned_to_user_id,
            title: params
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }
}

/// Query string of `GET /api/projects`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectSearchParams {
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Comments

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommentRequest {
    #[serde(default)]
    pub content: String,
}

impl Validate for CommentRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        not_blank(&mut errors, "content", &self.content, "Content cannot be blank");
        into_result(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content.clone(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

impl Relation for CommentResponse {
    const COLLECTION_RELATION: &'static str = "comments";
}
