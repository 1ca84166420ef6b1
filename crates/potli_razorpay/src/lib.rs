// --- File: crates/potli_razorpay/src/lib.rs ---

pub mod client;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod routes;
pub mod service;

#[cfg(test)]
mod handlers_test;

pub use error::RazorpayError;
pub use handlers::RazorpayState;
pub use routes::routes;
pub use service::RazorpayProviderService;
