// handlers/mod.rs - one module per resource; routing lives in lib.rs
//
// Access rules are not decided here. `middleware::auth::authenticate` runs in
// front of every route and handlers that need a principal take `CurrentUser`.

pub mod auth;
pub mod comments;
pub mod projects;
pub mod system;
pub mod tasks;
pub mod users;
