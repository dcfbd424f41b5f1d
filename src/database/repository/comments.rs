use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Comment;

const COMMENT_COLUMNS: &str = "id, content, task_id, author_id, created_at, updated_at";

#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_task(&self, task_id: i64) -> Result<Vec<Comment>, DatabaseError> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE task_id = $1 ORDER BY id"
        ))
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    /// Only returns the comment when it belongs to `task_id`
    pub async fn find_by_id_and_task(
        &self,
        id: i64,
        task_id: i64,
    ) -> Result<Option<Comment>, DatabaseError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1 AND task_id = $2"
        ))
        .bind(id)
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    pub async fn insert(
        &self,
        task_id: i64,
        author_id: i64,
        content: &str,
    ) -> Result<Comment, DatabaseError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (content, task_id, author_id) VALUES ($1, $2, $3)
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(content)
        .bind(task_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    pub async fn update_content(&self, id: i64, content: &str) -> Result<Comment, DatabaseError> {
        match sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments SET content = $2, updated_at = now() WHERE id = $1
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        {
            Ok(comment) => Ok(comment),
            Err(sqlx::Error::RowNotFound) => {
                Err(DatabaseError::NotFound(format!("Comment not found with id: {}", id)))
            }
            Err(other) => Err(other.into()),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
