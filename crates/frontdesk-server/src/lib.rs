pub mod auth;
pub mod handlers;
pub mod payload;
pub mod routes;

pub use routes::{build_router, AppState};
