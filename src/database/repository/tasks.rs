use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::task::TaskRow;
use crate::database::models::{Task, TaskChanges};

/// Joins reporter, assignee and project so a task loads in one round trip
const TASK_SELECT: &str = r#"
    SELECT
        t.id, t.title, t.description, t.state, t.due_date, t.created_at, t.updated_at,
        r.id AS reporter_id, r.username AS reporter_username, r.email AS reporter_email,
        r.role AS reporter_role, r.created_at AS reporter_created_at, r.updated_at AS reporter_updated_at,
        a.id AS assignee_id, a.username AS assignee_username, a.email AS assignee_email,
        a.role AS assignee_role, a.created_at AS assignee_created_at, a.updated_at AS assignee_updated_at,
        p.id AS project_id, p.name AS project_name,
        p.created_at AS project_created_at, p.updated_at AS project_updated_at
    FROM tasks t
    JOIN users r ON r.id = t.reported_by_user_id
    LEFT JOIN users a ON a.id = t.assigned_to_user_id
    JOIN projects p ON p.id = t.belongs_to_project_id
"#;

/// Optional search criteria; unset fields do not filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub project_id: Option<i64>,
    pub assigned_to_user_id: Option<i64>,
    /// Case-insensitive substring of the title
    pub title: Option<String>,
}

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Task>, DatabaseError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!("{TASK_SELECT} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Task::try_from).transpose()
    }

    pub async fn search(&self, filter: &TaskFilter) -> Result<Vec<Task>, DatabaseError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "{TASK_SELECT}
             WHERE ($1::BIGINT IS NULL OR t.belongs_to_project_id = $1)
               AND ($2::BIGINT IS NULL OR t.assigned_to_user_id = $2)
               AND ($3::TEXT IS NULL OR strpos(lower(t.title), lower($3)) > 0)
             ORDER BY t.id"
        ))
        .bind(filter.project_id)
        .bind(filter.assigned_to_user_id)
        .bind(filter.title.as_deref())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    pub async fn exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn insert(
        &self,
        changes: &TaskChanges,
        reporter_id: i64,
        project_id: i64,
    ) -> Result<Task, DatabaseError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO tasks
                (title, description, state, due_date, assigned_to_user_id,
                 reported_by_user_id, belongs_to_project_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(&changes.title)
        .bind(changes.description.as_deref())
        .bind(changes.state.as_str())
        .bind(changes.due_date)
        .bind(changes.assigned_to_user_id)
        .bind(reporter_id)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Task not found with id: {}", id)))
    }

    /// Returns `None` when no task has this id
    pub async fn update(&self, id: i64, changes: &TaskChanges) -> Result<Option<Task>, DatabaseError> {
        let result = sqlx::query(
            "UPDATE tasks
             SET title = $2, description = $3, state = $4, due_date = $5,
                 assigned_to_user_id = $6, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(changes.description.as_deref())
        .bind(changes.state.as_str())
        .bind(changes.due_date)
        .bind(changes.assigned_to_user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
