//! # Auth Module
//!
//! Bearer JWT verification and the per-route access policy.

pub mod errors;
pub mod jwt;
pub mod policy;

pub use errors::{AuthError, AuthResult};
pub use jwt::{JwtClaims, JwtConfig, JwtManager};
pub use policy::{AccessPolicy, Authenticator, RequestContext};
