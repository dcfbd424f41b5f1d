pub mod auth_service;
pub mod comment_service;
pub mod project_service;
pub mod task_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use comment_service::CommentService;
pub use project_service::ProjectService;
pub use task_service::TaskService;
pub use user_service::UserService;
