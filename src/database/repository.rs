//! Per-entity repositories. Each wraps a clone of the shared pool and exposes
//! the finder methods the services need, nothing generic.

mod comments;
mod projects;
mod tasks;
mod users;

pub use comments::CommentRepository;
pub use projects::ProjectRepository;
pub use tasks::{TaskFilter, TaskRepository};
pub use users::UserRepository;
