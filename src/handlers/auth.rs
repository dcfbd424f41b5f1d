// handlers/auth.rs - token acquisition and the current principal

use axum::{extract::State, Json};

use crate::api::dto::{LoginRequest, RefreshTokenRequest, RegisterRequest, UserResponse};
use crate::api::EntityModel;
use crate::auth::TokenPair;
use crate::error::{ApiError, ErrorBody};
use crate::middleware::{CurrentUser, Hal, ValidJson};
use crate::state::AppState;

/// POST /api/auth/login - Exchange credentials for an access/refresh token pair
///
/// ```json
/// { "username": "erika.muster", "password": "password123" }
/// ```
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access and refresh token", body = TokenPair),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    Ok(Json(state.auth.login(request).await?))
}

/// POST /api/auth/register - Self-service signup, always as ROLE_USER
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Username or email taken", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<Hal<EntityModel<UserResponse>>, ApiError> {
    let user = state.users.create(request.into()).await?;
    let model = state.assembler.user(&user);
    let location = model.self_href().map(str::to_owned);
    Ok(Hal::created(model, location))
}

/// POST /api/auth/refreshtoken - Trade a refresh token for a fresh pair
#[utoipa::path(
    post,
    path = "/api/auth/refreshtoken",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorBody)
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RefreshTokenRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    Ok(Json(state.auth.refresh(&request.refresh_token).await?))
}

/// GET /api/auth/me - The user the bearer token belongs to
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Hal<EntityModel<UserResponse>> {
    Hal::ok(state.assembler.user(&user))
}
