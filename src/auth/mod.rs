//! Credentials, tokens and the authentication layer.

pub mod bootstrap;
pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::require_auth;
pub use token::{Claims, Identity, TokenService, ADMIN_ROLE};
