use crate::database::models::{Comment, UserProfile};
use crate::database::{CommentRepository, TaskRepository};
use crate::error::ApiError;

#[derive(Clone)]
pub struct CommentService {
    comments: CommentRepository,
    tasks: TaskRepository,
}

impl CommentService {
    pub fn new(comments: CommentRepository, tasks: TaskRepository) -> Self {
        Self { comments, tasks }
    }

    pub async fn list(&self, task_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.ensure_task_exists(task_id).await?;
        Ok(self.comments.find_by_task(task_id).await?)
    }

    /// A comment is only visible through the task it belongs to
    pub async fn get(&self, task_id: i64, comment_id: i64) -> Result<Comment, ApiError> {
        self.comments
            .find_by_id_and_task(comment_id, task_id)
            .await?
            .ok_or_else(|| {
                ApiError::not_found(format!(
                    "Comment not found with id {} for task {}",
                    comment_id, task_id
                ))
            })
    }

    pub async fn create(
        &self,
        task_id: i64,
        author: &UserProfile,
        content: &str,
    ) -> Result<Comment, ApiError> {
        self.ensure_task_exists(task_id).await?;
        let comment = self.comments.insert(task_id, author.id, content).await?;
        tracing::info!(comment_id = comment.id, task_id, author = %author.username, "Created comment");
        Ok(comment)
    }

    pub async fn update(
        &self,
        task_id: i64,
        comment_id: i64,
        user: &UserProfile,
        content: &str,
    ) -> Result<Comment, ApiError> {
        let existing = self.get(task_id, comment_id).await?;
        check_is_author(&existing, user)?;
        Ok(self.comments.update_content(existing.id, content).await?)
    }

    pub async fn delete(&self, task_id: i64, comment_id: i64, user: &UserProfile) -> Result<(), ApiError> {
        let existing = self.get(task_id, comment_id).await?;
        check_is_author(&existing, user)?;
        self.comments.delete(existing.id).await?;
        Ok(())
    }

    async fn ensure_task_exists(&self, task_id: i64) -> Result<(), ApiError> {
        if self.tasks.exists(task_id).await? {
            Ok(())
        } else {
            Err(ApiError::not_found(format!("Task not found with id: {}", task_id)))
        }
    }
}

/// Only the author may change or remove a comment
fn check_is_author(comment: &Comment, user: &UserProfile) -> Result<(), ApiError> {
    if comment.author_id == user.id {
        Ok(())
    } else {
        tracing::warn!(
            comment_id = comment.id,
            user = %user.username,
            "Rejected change to another user's comment"
        );
        Err(ApiError::forbidden("User is not the author of this comment."))
    }
}
