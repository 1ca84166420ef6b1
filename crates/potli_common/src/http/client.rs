// --- File: crates/potli_common/src/http/client.rs ---
use once_cell::sync::Lazy;
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Default timeout for vendor API requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shared client for vendor APIs (Razorpay, Resend).
///
/// Falls back to an unconfigured client if the builder fails, which only
/// happens when the TLS backend cannot initialise.
pub static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    create_client(DEFAULT_TIMEOUT_SECS, true).unwrap_or_else(|e| {
        tracing::error!("🚨 Failed to build HTTP client, using defaults: {}", e);
        Client::new()
    })
});

/// Creates a new HTTP client with a timeout and redirect policy.
pub fn create_client(timeout_secs: u64, follow_redirects: bool) -> Result<Client, ReqwestError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(if follow_redirects {
            reqwest::redirect::Policy::default()
        } else {
            reqwest::redirect::Policy::none()
        })
        .build()
}
