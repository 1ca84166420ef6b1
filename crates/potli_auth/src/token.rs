//! Signed email verification tokens.
//!
//! `base64url(json) + "." + hex(hmac_sha256(secret, json))`, valid for 24 hours.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;

pub const TOKEN_EXPIRY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationTokenPayload {
    pub customer_id: String,
    pub email: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

fn sign(secret: &str, payload: &str) -> String {
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub fn generate_verification_token(secret: &str, customer_id: &str, email: &str) -> String {
    generate_verification_token_at(secret, customer_id, email, Utc::now().timestamp_millis())
}

pub fn generate_verification_token_at(secret: &str, customer_id: &str, email: &str, now_ms: i64) -> String {
    let payload = VerificationTokenPayload {
        customer_id: customer_id.to_string(),
        email: email.to_string(),
        created_at: now_ms,
    };
    // Serializing a struct of strings and an integer cannot fail.
    let json = serde_json::to_string(&payload).unwrap_or_default();
    format!("{}.{}", URL_SAFE_NO_PAD.encode(&json), sign(secret, &json))
}

/// The payload when the signature holds and the token is under 24 hours old.
pub fn verify_verification_token(secret: &str, token: &str) -> Option<VerificationTokenPayload> {
    verify_verification_token_at(secret, token, Utc::now().timestamp_millis())
}

pub fn verify_verification_token_at(
    secret: &str,
    token: &str,
    now_ms: i64,
) -> Option<VerificationTokenPayload> {
    let (encoded, signature) = token.split_once('.')?;
    if encoded.is_empty() || signature.is_empty() {
        return None;
    }

    let json = URL_SAFE_NO_PAD
        .decode(encoded.trim_end_matches('='))
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())?;

    let expected = sign(secret, &json);
    if expected.is_empty() || !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
        debug!("Verification token signature mismatch");
        return None;
    }

    let payload: VerificationTokenPayload = serde_json::from_str(&json).ok()?;
    if now_ms > payload.created_at + TOKEN_EXPIRY_MS {
        debug!("Verification token for {} expired", payload.customer_id);
        return None;
    }
    Some(payload)
}
