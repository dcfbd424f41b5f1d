pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod types;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::authenticate;
use crate::state::AppState;

/// All routes behind the JWT gate. CORS is left to the caller.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .route("/v3/api-docs", get(handlers::system::api_docs))
        .merge(auth_routes())
        .merge(user_routes())
        .merge(project_routes())
        .merge(task_routes())
        .merge(comment_routes())
        .layer(axum::middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/refreshtoken", post(auth::refresh_token))
        .route("/api/auth/me", get(auth::me))
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/:id", get(users::get))
}

fn project_routes() -> Router<AppState> {
    use handlers::projects;

    Router::new()
        .route("/api/projects", get(projects::search).post(projects::create))
        .route("/api/projects/:id", get(projects::get))
        .route(
            "/api/projects/:id/tasks",
            get(projects::tasks).post(projects::create_task),
        )
}

fn task_routes() -> Router<AppState> {
    use handlers::tasks;

    Router::new()
        .route("/api/tasks", get(tasks::search))
        .route(
            "/api/tasks/:id",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
}

fn comment_routes() -> Router<AppState> {
    use handlers::comments;

    Router::new()
        .route(
            "/api/tasks/:id/comments",
            get(comments::list).post(comments::create),
        )
        .route(
            "/api/tasks/:id/comments/:comment_id",
            get(comments::get)
                .put(comments::update)
                .delete(comments::delete),
        )
}

/// Permissive when no origins are configured or `*` is listed
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
        .expose_headers([axum::http::header::LOCATION])
}
