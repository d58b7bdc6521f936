//! `storefront-auth`: authentication/authorization boundary.
//!
//! Decoupled from HTTP and storage: token decoding, claim checks, and role
//! policy only.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod roles;

pub use authorize::{AuthzError, Principal, require_role, require_seller};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use roles::Role;
