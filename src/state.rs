use sqlx::PgPool;

use crate::api::{LinkBuilder, ModelAssembler};
use crate::auth::{self, AuthError, JwtService};
use crate::config::AppConfig;
use crate::database::{CommentRepository, ProjectRepository, TaskRepository, UserRepository};
use crate::services::{AuthService, CommentService, ProjectService, TaskService, UserService};

/// Everything a handler needs, cloned per request. All members are cheap
/// handles around the shared pool.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: AuthService,
    pub users: UserService,
    pub projects: ProjectService,
    pub tasks: TaskService,
    pub comments: CommentService,
    pub assembler: ModelAssembler,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig) -> Result<Self, AuthError> {
        let jwt = JwtService::new(&config.security)?;
        let bcrypt_cost = auth::check_bcrypt_cost(config.security.bcrypt_cost)?;

        let user_repo = UserRepository::new(pool.clone());
        let project_repo = ProjectRepository::new(pool.clone());
        let task_repo = TaskRepository::new(pool.clone());
        let comment_repo = CommentRepository::new(pool.clone());

        Ok(Self {
            auth: AuthService::new(user_repo.clone(), jwt, bcrypt_cost),
            users: UserService::new(user_repo.clone(), bcrypt_cost),
            projects: ProjectService::new(project_repo.clone(), task_repo.clone()),
            tasks: TaskService::new(task_repo.clone(), project_repo, user_repo),
            comments: CommentService::new(comment_repo, task_repo),
            assembler: ModelAssembler::new(LinkBuilder::new(config.server.base_url())),
            pool,
        })
    }
}
