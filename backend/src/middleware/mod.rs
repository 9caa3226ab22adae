//! Request middleware

pub mod auth;
pub mod method_override;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
pub use method_override::method_override;
