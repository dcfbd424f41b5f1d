use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::database::models::UserProfile;
use crate::error::ApiError;
use crate::state::AppState;

/// What a route requires from the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

/// Security rules, first match wins. Reads stay open under `/api`, writes need a principal.
pub fn required_access(method: &Method, path: &str) -> Access {
    let path = path.trim_end_matches('/');
    let path = if path.is_empty() { "/" } else { path };

    match (method, path) {
        (&Method::GET, "/") | (&Method::GET, "/health") => Access::Public,
        (&Method::GET, p) if p == "/v3/api-docs" || p.starts_with("/v3/api-docs/") => Access::Public,
        (&Method::POST, "/api/auth/login")
        | (&Method::POST, "/api/auth/register")
        | (&Method::POST, "/api/auth/refreshtoken") => Access::Public,
        (&Method::GET, "/api/auth/me") => Access::Authenticated,
        (&Method::GET, p) if p == "/api" || p.starts_with("/api/") => Access::Public,
        _ => Access::Authenticated,
    }
}

/// Principal attached to the request once its bearer token checked out
#[derive(Clone, Debug)]
pub struct CurrentUser(pub UserProfile);

/// Bearer token from the Authorization header. Headers using another scheme
/// are ignored rather than rejected.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let Ok(value) = value.to_str() else {
        return Ok(None);
    };
    match value.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err(ApiError::unauthorized("Empty JWT token")),
        Some(token) => Ok(Some(token.trim())),
        None => Ok(None),
    }
}

/// JWT gate: a valid token always yields an attached `CurrentUser`; an invalid
/// one is rejected even on public routes.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let access = required_access(request.method(), request.uri().path());

    let token = bearer_token(request.headers())?.map(str::to_owned);
    if let Some(token) = token {
        let user = state.auth.authenticate_token(&token).await?;
        tracing::debug!(username = %user.username, "Authenticated request");
        request.extensions_mut().insert(CurrentUser(user));
    }

    if access == Access::Authenticated && request.extensions().get::<CurrentUser>().is_none() {
        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected unauthenticated request"
        );
        return Err(ApiError::unauthorized("Authentication required"));
    }

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
