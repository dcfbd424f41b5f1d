pub mod comment;
pub mod project;
pub mod task;
pub mod user;

pub use comment::Comment;
pub use project::Project;
pub use task::{Task, TaskChanges};
pub use user::{NewUser, User, UserProfile};
