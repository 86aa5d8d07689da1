//! `storefront-auth`: authentication/authorization boundary.
//!
//! Tokens are issued by the hosted auth provider; this crate only verifies
//! them and answers "may this principal do X". It is decoupled from HTTP and
//! storage.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod roles;

pub use authorize::{AuthzError, Principal, authorize};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use permissions::Permission;
pub use roles::{Role, permissions_for_roles};
