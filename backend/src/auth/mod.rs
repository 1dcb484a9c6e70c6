//! Authentication module
//!
//! Verifies bearer tokens issued by the identity provider. Registration,
//! login and sessions live with the provider.

mod jwt;
mod middleware;

pub use jwt::{Claims, JwtService, UserMetadata};
pub use middleware::AuthUser;
