use chrono::NaiveDate;

use crate::api::dto::TaskRequest;
use crate::database::models::{Task, UserProfile};
use crate::database::{ProjectRepository, TaskFilter, TaskRepository, UserRepository};
use crate::error::ApiError;

#[derive(Clone)]
pub struct TaskService {
    tasks: TaskRepository,
    projects: ProjectRepository,
    users: UserRepository,
}

impl TaskService {
    pub fn new(tasks: TaskRepository, projects: ProjectRepository, users: UserRepository) -> Self {
        Self {
            tasks,
            projects,
            users,
        }
    }

    pub async fn search(&self, filter: &TaskFilter) -> Result<Vec<Task>, ApiError> {
        Ok(self.tasks.search(filter).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Task, ApiError> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Task not found with id: {}", id)))
    }

    /// Create a task in `project_id`, reported by `reporter`
    pub async fn create(
        &self,
        project_id: i64,
        reporter: &UserProfile,
        request: TaskRequest,
        today: NaiveDate,
    ) -> Result<Task, ApiError> {
        request
            .validate_due_date_from(today)
            .map_err(ApiError::validation_error)?;

        if !self.projects.exists(project_id).await? {
            return Err(ApiError::not_found(format!(
                "Project not found with id: {}",
                project_id
            )));
        }
        self.ensure_assignee_exists(request.assigned_to_user_id).await?;

        let task = self
            .tasks
            .insert(&request.into_changes(), reporter.id, project_id)
            .await?;
        tracing::info!(task_id = task.id, project_id, reporter = %reporter.username, "Created task");
        Ok(task)
    }

    pub async fn update(&self, id: i64, request: TaskRequest) -> Result<Task, ApiError> {
        self.ensure_assignee_exists(request.assigned_to_user_id).await?;

        self.tasks
            .update(id, &request.into_changes())
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Task not found with id: {}", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if self.tasks.delete(id).await? {
            tracing::info!(task_id = id, "Deleted task");
            Ok(())
        } else {
            Err(ApiError::not_found(format!("Task not found with id: {}", id)))
        }
    }

    async fn ensure_assignee_exists(&self, user_id: Option<i64>) -> Result<(), ApiError> {
        match user_id {
            Some(id) if !self.users.exists(id).await? => {
                Err(ApiError::not_found(format!("User not found with id: {}", id)))
            }
            _ => Ok(()),
        }
    }
}
