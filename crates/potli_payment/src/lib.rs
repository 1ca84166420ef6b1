// --- File: crates/potli_payment/src/lib.rs ---

pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod routes;
pub mod service;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
mod service_test;

pub use error::PaymentError;
pub use handlers::PaymentState;
pub use logic::{is_provider_session, provider_id_for};
pub use routes::{admin_routes, store_routes};
pub use service::{CreatePaymentSessionInput, PaymentModule};
