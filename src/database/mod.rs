pub mod manager;
pub mod models;
pub mod repository;
pub mod seed;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{CommentRepository, ProjectRepository, TaskFilter, TaskRepository, UserRepository};
