// handlers/comments.rs - /api/tasks/:taskId/comments

use axum::extract::State;

use crate::api::dto::{CommentRequest, CommentResponse};
use crate::api::{CollectionModel, EntityModel};
use crate::error::{ApiError, ErrorBody};
use crate::middleware::{CurrentUser, Hal, NoContent, PathParams, ValidJson};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/tasks/{id}/comments",
    tag = "comments",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 200, description = "HAL collection, comments under `_embedded.comments`"),
        (status = 404, description = "Task not found", body = ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    PathParams(task_id): PathParams<i64>,
) -> Result<Hal<CollectionModel<CommentResponse>>, ApiError> {
    let comments = state.comments.list(task_id).await?;
    Ok(Hal::ok(state.assembler.comments(task_id, &comments)))
}

#[utoipa::path(
    post,
    path = "/api/tasks/{id}/comments",
    tag = "comments",
    params(("id" = i64, Path, description = "Task id")),
    request_body = CommentRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Task not found", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    PathParams(task_id): PathParams<i64>,
    CurrentUser(author): CurrentUser,
    ValidJson(request): ValidJson<CommentRequest>,
) -> Result<Hal<EntityModel<CommentResponse>>, ApiError> {
    let comment = state.comments.create(task_id, &author, &request.content).await?;
    let model = state.assembler.comment(&comment);
    let location = model.self_href().map(str::to_owned);
    Ok(Hal::created(model, location))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}/comments/{commentId}",
    tag = "comments",
    params(("id" = i64, Path, description = "Task id"), ("commentId" = i64, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment", body = CommentResponse),
        (status = 404, description = "No such comment on this task", body = ErrorBody)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    PathParams((task_id, comment_id)): PathParams<(i64, i64)>,
) -> Result<Hal<EntityModel<CommentResponse>>, ApiError> {
    let comment = state.comments.get(task_id, comment_id).await?;
    Ok(Hal::ok(state.assembler.comment(&comment)))
}

/// Only the author may edit (403 otherwise)
#[utoipa::path(
    put,
    path = "/api/tasks/{id}/comments/{commentId}",
    tag = "comments",
    params(("id" = i64, Path, description = "Task id"), ("commentId" = i64, Path, description = "Comment id")),
    request_body = CommentRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Updated comment", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Caller is not the author", body = ErrorBody),
        (status = 404, description = "No such comment on this task", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    PathParams((task_id, comment_id)): PathParams<(i64, i64)>,
    CurrentUser(user): CurrentUser,
    ValidJson(request): ValidJson<CommentRequest>,
) -> Result<Hal<EntityModel<CommentResponse>>, ApiError> {
    let comment = state
        .comments
        .update(task_id, comment_id, &user, &request.content)
        .await?;
    Ok(Hal::ok(state.assembler.comment(&comment)))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}/comments/{commentId}",
    tag = "comments",
    params(("id" = i64, Path, description = "Task id"), ("commentId" = i64, Path, description = "Comment id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Caller is not the author", body = ErrorBody),
        (status = 404, description = "No such comment on this task", body = ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    PathParams((task_id, comment_id)): PathParams<(i64, i64)>,
    CurrentUser(user): CurrentUser,
) -> Result<NoContent, ApiError> {
    state.comments.delete(task_id, comment_id, &user).await?;
    Ok(NoContent)
}
