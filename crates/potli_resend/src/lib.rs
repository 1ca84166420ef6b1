// --- File: crates/potli_resend/src/lib.rs ---

pub mod error;
pub mod logic;
pub mod service;
pub mod templates;

#[cfg(test)]
mod service_test;

pub use error::ResendError;
pub use service::ResendNotificationService;
pub use templates::{PASSWORD_RESET, USER_INVITE};
