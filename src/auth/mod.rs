//! Token authentication for the REST API
//!
//! Clients send `Authorization: Token <jwt>` (or `Bearer <jwt>`).

mod extract;
pub mod jwt;

pub use extract::AuthUser;
pub use jwt::{Claims, generate_token, validate_token};
