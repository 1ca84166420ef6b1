// --- File: crates/potli_auth/src/lib.rs ---
//! Authentication for the Potli backend.
//!
//! Identities arrive as HS256 JWTs signed with `JWT_SECRET`; [`middleware`]
//! verifies them and attaches an [`AuthContext`]. Storefront customers get an
//! emailed verification link ([`token`], [`verification`]) on registration.

pub mod doc;
pub mod error;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod routes;
pub mod subscribers;
pub mod token;
pub mod verification;

#[cfg(test)]
pub mod mock;

pub use error::AuthError;
pub use handlers::AuthState;
pub use jwt::{
    decode_reset_token, decode_token, issue_reset_token, issue_token, AuthContext, ADMIN_ACTOR,
    CUSTOMER_ACTOR,
};
pub use middleware::{authenticate, require_admin};
pub use routes::{auth_routes, routes, store_routes};
pub use subscribers::{spawn_subscribers, AuthSubscribers};
pub use verification::EmailVerificationService;
