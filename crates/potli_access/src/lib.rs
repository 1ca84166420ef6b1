// --- File: crates/potli_access/src/lib.rs ---
//! The "Users & Developer" settings gate.
//!
//! Admin sections that manage people and integrations are limited to emails
//! on `ALLOWED_SETTINGS_ACCESS_EMAILS` and to users whose metadata carries
//! `can_access_users_developer: true`. The crate also owns the admin user and
//! invite endpoints those sections drive.

pub mod doc;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod invites;
pub mod middleware;
pub mod routes;
pub mod subscribers;

#[cfg(test)]
mod handlers_test;
#[cfg(test)]
mod subscribers_test;

pub use error::AccessError;
pub use gate::{is_restricted_path, SettingsGate, ACCESS_FLAG};
pub use handlers::AccessState;
pub use invites::{AcceptInvite, InviteService};
pub use middleware::require_settings_access;
pub use routes::{admin_routes, public_routes};
pub use subscribers::{spawn_subscribers, AccessSubscribers};
