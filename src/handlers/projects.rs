// handlers/projects.rs - /api/projects and the tasks nested under a project

use axum::extract::State;

use crate::api::dto::{ProjectRequest, ProjectResponse, ProjectSearchParams, TaskRequest, TaskResponse, TaskSearchParams};
use crate::api::{CollectionModel, EntityModel};
use crate::database::TaskFilter;
use crate::error::{ApiError, ErrorBody};
use crate::middleware::{CurrentUser, Hal, PathParams, QueryParams, ValidJson};
use crate::state::AppState;

/// POST /api/projects - 409 when the name is taken
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "projects",
    request_body = ProjectRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 409, description = "Name taken", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<ProjectRequest>,
) -> Result<Hal<EntityModel<ProjectResponse>>, ApiError> {
    let project = state.projects.create(request).await?;
    let model = state.assembler.project(&project);
    let location = model.self_href().map(str::to_owned);
    Ok(Hal::created(model, location))
}

/// GET /api/projects?name= - Case-insensitive name search
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    params(ProjectSearchParams),
    responses(
        (status = 200, description = "HAL collection, projects under `_embedded.projects`")
    )
)]
pub async fn search(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ProjectSearchParams>,
) -> Result<Hal<CollectionModel<ProjectResponse>>, ApiError> {
    let name = params.name.as_deref();
    let projects = state.projects.search(name).await?;
    Ok(Hal::ok(state.assembler.projects(&projects, name)))
}

/// GET /api/projects/:id
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 404, description = "Project not found", body = ErrorBody)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> Result<Hal<EntityModel<ProjectResponse>>, ApiError> {
    let project = state.projects.get(id).await?;
    Ok(Hal::ok(state.assembler.project(&project)))
}

/// GET /api/projects/:id/tasks?assignedToUserId=&title=
#[utoipa::path(
    get,
    path = "/api/projects/{id}/tasks",
    tag = "projects",
    params(("id" = i64, Path, description = "Project id"), TaskSearchParams),
    responses(
        (status = 200, description = "HAL collection, tasks under `_embedded.tasks`"),
        (status = 404, description = "Project not found", body = ErrorBody)
    )
)]
pub async fn tasks(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    QueryParams(params): QueryParams<TaskSearchParams>,
) -> Result<Hal<CollectionModel<TaskResponse>>, ApiError> {
    let filter = TaskFilter::from(params);
    let self_href = state.assembler.links.project_tasks(id, &filter);
    let tasks = state.projects.tasks(id, filter).await?;
    Ok(Hal::ok(state.assembler.tasks(&tasks, self_href)))
}

/// POST /api/projects/:id/tasks - New task reported by the caller
#[utoipa::path(
    post,
    path = "/api/projects/{id}/tasks",
    tag = "projects",
    params(("id" = i64, Path, description = "Project id")),
    request_body = TaskRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Project or assignee not found", body = ErrorBody)
    )
)]
pub async fn create_task(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    CurrentUser(reporter): CurrentUser,
    ValidJson(request): ValidJson<TaskRequest>,
) -> Result<Hal<EntityModel<TaskResponse>>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let task = state.tasks.create(id, &reporter, request, today).await?;

    let model = state.assembler.task(&task);
    let location = model.self_href().map(str::to_owned);
    Ok(Hal::created(model, location))
}
