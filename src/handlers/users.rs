// handlers/users.rs - /api/users

use axum::extract::State;

use crate::api::dto::{UserRequest, UserResponse};
use crate::api::{CollectionModel, EntityModel};
use crate::error::{ApiError, ErrorBody};
use crate::middleware::{CurrentUser, Hal, PathParams, ValidJson};
use crate::state::AppState;

/// POST /api/users - Create an account with an explicit role
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = UserRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 409, description = "Username or email taken", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(creator): CurrentUser,
    ValidJson(request): ValidJson<UserRequest>,
) -> Result<Hal<EntityModel<UserResponse>>, ApiError> {
    let user = state.users.create(request).await?;
    tracing::debug!(created_by = %creator.username, user_id = user.id, "User created via API");

    let model = state.assembler.user(&user);
    let location = model.self_href().map(str::to_owned);
    Ok(Hal::created(model, location))
}

/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "HAL collection, users under `_embedded.users`")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Hal<CollectionModel<UserResponse>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Hal::ok(state.assembler.users(&users)))
}

/// GET /api/users/:id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> Result<Hal<EntityModel<UserResponse>>, ApiError> {
    let user = state.users.get(id).await?;
    Ok(Hal::ok(state.assembler.user(&user)))
}
