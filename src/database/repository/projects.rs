use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Project;

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Project>, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, created_at, updated_at FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Project>, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, created_at, updated_at FROM projects WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    /// Case-insensitive substring match on the name; `None` lists everything
    pub async fn search(&self, name: Option<&str>) -> Result<Vec<Project>, DatabaseError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, name, created_at, updated_at FROM projects
             WHERE ($1::TEXT IS NULL OR strpos(lower(name), lower($1)) > 0)
             ORDER BY id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    pub async fn exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn insert(&self, name: &str) -> Result<Project, DatabaseError> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (name) VALUES ($1)
             RETURNING id, name, created_at, updated_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "project name already in use"))
    }
}
