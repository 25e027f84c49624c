//! Bearer token authentication.

pub mod jwt;
pub mod models;

pub use jwt::{JwtClaims, JwtValidator};
pub use models::AuthUser;
