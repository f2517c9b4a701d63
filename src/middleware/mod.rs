pub mod auth;

pub use auth::{jwt_auth_middleware, require_manager_middleware, SessionUser};
