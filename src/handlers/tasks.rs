// handlers/tasks.rs - /api/tasks

use axum::extract::State;

use crate::api::dto::{TaskRequest, TaskResponse, TaskSearchParams};
use crate::api::{CollectionModel, EntityModel};
use crate::database::TaskFilter;
use crate::error::{ApiError, ErrorBody};
use crate::middleware::{Hal, NoContent, PathParams, QueryParams, ValidJson};
use crate::state::AppState;

/// GET /api/tasks?projectId=&assignedToUserId=&title=
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    params(TaskSearchParams),
    responses(
        (status = 200, description = "HAL collection, tasks under `_embedded.tasks`")
    )
)]
pub async fn search(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<TaskSearchParams>,
) -> Result<Hal<CollectionModel<TaskResponse>>, ApiError> {
    let filter = TaskFilter::from(params);
    let tasks = state.tasks.search(&filter).await?;
    let self_href = state.assembler.links.tasks(&filter);
    Ok(Hal::ok(state.assembler.tasks(&tasks, self_href)))
}

/// GET /api/tasks/:id
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task", body = TaskResponse),
        (status = 404, description = "Task not found", body = ErrorBody)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> Result<Hal<EntityModel<TaskResponse>>, ApiError> {
    let task = state.tasks.get(id).await?;
    Ok(Hal::ok(state.assembler.task(&task)))
}

/// PUT /api/tasks/:id - Replaces every editable field; reporter and project stay
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task id")),
    request_body = TaskRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Updated task", body = TaskResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Task or assignee not found", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    ValidJson(request): ValidJson<TaskRequest>,
) -> Result<Hal<EntityModel<TaskResponse>>, ApiError> {
    let task = state.tasks.update(id, request).await?;
    Ok(Hal::ok(state.assembler.task(&task)))
}

/// DELETE /api/tasks/:id
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "Task and its comments deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Task not found", body = ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> Result<NoContent, ApiError> {
    state.tasks.delete(id).await?;
    Ok(NoContent)
}
