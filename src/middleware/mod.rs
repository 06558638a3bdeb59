pub mod auth;
pub mod cors;
pub mod response;

pub use auth::{bearer_guard, AuthSession};
pub use cors::cors_layer;
pub use response::{ApiResponse, ApiResult};
