//! OpenAPI 3 description of the HTTP API, served at `GET /v3/api-docs`

use utoipa::openapi::schema::{ObjectBuilder, Schema, SchemaType};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::{Ref, RefOr};
use utoipa::{Modify, OpenApi};

use crate::api::dto::{
    CommentRequest, CommentResponse, LoginRequest, ProjectRequest, ProjectResponse,
    RefreshTokenRequest, RegisterRequest, TaskRequest, TaskResponse, UserRequest, UserResponse,
};
use crate::api::hal::Link;
use crate::auth::TokenPair;
use crate::error::ErrorBody;
use crate::handlers;
use crate::types::{Role, TaskState};

pub const BEARER_SCHEME: &str = "bearerAuth";

/// Entity schemas that are rendered with `_links`
const HAL_ENTITIES: [&str; 4] = ["UserResponse", "ProjectResponse", "TaskResponse", "CommentResponse"];

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task Tracking API",
        description = "Users, projects, tasks and comments as HAL resources. \
                       Reads under /api are public, writes need a bearer token."
    ),
    paths(
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::refresh_token,
        handlers::auth::me,
        handlers::users::create,
        handlers::users::list,
        handlers::users::get,
        handlers::projects::create,
        handlers::projects::search,
        handlers::projects::get,
        handlers::projects::tasks,
        handlers::projects::create_task,
        handlers::tasks::search,
        handlers::tasks::get,
        handlers::tasks::update,
        handlers::tasks::delete,
        handlers::comments::list,
        handlers::comments::create,
        handlers::comments::get,
        handlers::comments::update,
        handlers::comments::delete,
    ),
    components(schemas(
        LoginRequest,
        RefreshTokenRequest,
        RegisterRequest,
        UserRequest,
        ProjectRequest,
        TaskRequest,
        CommentRequest,
        UserResponse,
        ProjectResponse,
        TaskResponse,
        CommentResponse,
        TokenPair,
        ErrorBody,
        Link,
        Role,
        TaskState,
    )),
    modifiers(&BearerAuth, &HalLinks),
    tags(
        (name = "auth", description = "Token acquisition and the current user"),
        (name = "users", description = "User accounts"),
        (name = "projects", description = "Projects and their tasks"),
        (name = "tasks", description = "Task search and maintenance"),
        (name = "comments", description = "Comments on a task"),
    )
)]
pub struct ApiDoc;

/// Registers the JWT bearer scheme referenced by protected operations
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                BEARER_SCHEME,
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Adds the `_links` map (relation → `Link`) to every entity schema
struct HalLinks;

impl Modify for HalLinks {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let Some(components) = openapi.components.as_mut() else {
            return;
        };

        let links = ObjectBuilder::new()
            .schema_type(SchemaType::Object)
            .description(Some("Hypermedia links keyed by relation name"))
            .additional_properties(Some(RefOr::Ref(Ref::from_schema_name("Link"))))
            .build();

        for name in HAL_ENTITIES {
            if let Some(RefOr::T(Schema::Object(object))) = components.schemas.get_mut(name) {
                object
                    .properties
                    .insert("_links".to_string(), RefOr::T(Schema::Object(links.clone())));
                object.required.push("_links".to_string());
            }
        }
    }
}
