pub mod auth;
pub mod extract;
pub mod response;
pub mod valid_json;

pub use auth::{authenticate, required_access, Access, CurrentUser};
pub use extract::{PathParams, QueryParams};
pub use response::{Hal, NoContent};
pub use valid_json::ValidJson;
