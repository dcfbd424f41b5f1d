// handlers/system.rs - GET /, GET /health and GET /v3/api-docs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use utoipa::OpenApi;

use crate::api::ApiDoc;
use crate::database::DatabaseManager;
use crate::state::AppState;

/// GET / - Service descriptor with an endpoint overview
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let links = &state.assembler.links;

    Json(json!({
        "name": "Task Tracking API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Users, projects, tasks and comments as HAL resources",
        "endpoints": {
            "auth": "/api/auth/login, /api/auth/register, /api/auth/refreshtoken (public), /api/auth/me (token)",
            "users": "/api/users[/:id]",
            "projects": "/api/projects[/:id][/tasks]",
            "tasks": "/api/tasks[/:id]",
            "comments": "/api/tasks/:taskId/comments[/:commentId]",
            "health": "/health (public)",
            "docs": "/v3/api-docs (public)"
        },
        "_links": {
            "users": { "href": links.users() },
            "projects": { "href": links.projects(None) },
            "tasks": { "href": links.tasks(&Default::default()) },
            "me": { "href": links.me() }
        }
    }))
}

/// GET /health - 200 while the database answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

/// GET /v3/api-docs - OpenAPI 3 document for every /api operation
pub async fn api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
