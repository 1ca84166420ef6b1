use crate::error::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `actor_type` of admin users.
pub const ADMIN_ACTOR: &str = "user";
pub const CUSTOMER_ACTOR: &str = "customer";

/// Lifetime of password reset tokens.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;

/// `purpose` claim carried by password reset tokens. Session tokens omit it.
const RESET_PURPOSE: &str = "password_reset";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    actor_id: String,
    actor_type: String,
    #[serde(default)]
    auth_identity_id: String,
    #[serde(default)]
    app_metadata: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
    exp: i64,
    iat: i64,
}

/// Who made the request, attached to request extensions by the middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub actor_id: String,
    pub actor_type: String,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.actor_type == ADMIN_ACTOR
    }
}

pub fn issue_token(
    secret: &str,
    actor_id: &str,
    actor_type: &str,
    ttl: Duration,
) -> Result<String, AuthError> {
    sign(secret, actor_id, actor_type, ttl, None)
}

fn sign(
    secret: &str,
    actor_id: &str,
    actor_type: &str,
    ttl: Duration,
    purpose: Option<&str>,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        actor_id: actor_id.to_string(),
        actor_type: actor_type.to_string(),
        auth_identity_id: String::new(),
        app_metadata: Value::Object(Default::default()),
        purpose: purpose.map(str::to_string),
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

fn decode_claims(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// Signature and expiry checked; only HS256 is accepted. Tokens minted for
/// another purpose (password reset) are not sessions and are rejected.
pub fn decode_token(secret: &str, token: &str) -> Result<AuthContext, AuthError> {
    let claims = decode_claims(secret, token)?;
    if claims.purpose.is_some() {
        return Err(AuthError::InvalidToken(ErrorKind::InvalidToken.into()));
    }
    Ok(AuthContext {
        actor_id: claims.actor_id,
        actor_type: claims.actor_type,
    })
}

pub fn issue_reset_token(secret: &str, entity_id: &str, actor_type: &str) -> Result<String, AuthError> {
    sign(
        secret,
        entity_id,
        actor_type,
        Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        Some(RESET_PURPOSE),
    )
}

/// Accepts only tokens from [`issue_reset_token`].
pub fn decode_reset_token(secret: &str, token: &str) -> Result<AuthContext, AuthError> {
    let claims = decode_claims(secret, token)?;
    if claims.purpose.as_deref() != Some(RESET_PURPOSE) {
        return Err(AuthError::InvalidToken(ErrorKind::InvalidToken.into()));
    }
    Ok(AuthContext {
        actor_id: claims.actor_id,
        actor_type: claims.actor_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_decode() {
        let token = issue_token("s3cret", "user_1", ADMIN_ACTOR, Duration::hours(1)).unwrap();
        let ctx = decode_token("s3cret", &token).unwrap();
        assert_eq!(ctx.actor_id, "user_1");
        assert!(ctx.is_admin());
    }

    #[test]
    fn test_wrong_secret_and_expired_tokens_fail() {
        let token = issue_token("s3cret", "cus_1", CUSTOMER_ACTOR, Duration::hours(1)).unwrap();
        assert!(matches!(decode_token("other", &token), Err(AuthError::InvalidToken(_))));

        // Past the default 60s leeway.
        let expired = issue_token("s3cret", "cus_1", CUSTOMER_ACTOR, Duration::minutes(-5)).unwrap();
        assert!(decode_token("s3cret", &expired).is_err());
        assert!(decode_token("s3cret", "not-a-jwt").is_err());
    }

    #[test]
    fn test_reset_token_is_short_lived() {
        let token = issue_reset_token("s3cret", "a@b.c", CUSTOMER_ACTOR).unwrap();
        let ctx = decode_reset_token("s3cret", &token).unwrap();
        assert_eq!(ctx.actor_id, "a@b.c");
        assert!(!ctx.is_admin());
    }

    #[test]
    fn test_reset_and_session_tokens_are_not_interchangeable() {
        let reset = issue_reset_token("s3cret", "admin@shop.com", ADMIN_ACTOR).unwrap();
        assert!(matches!(decode_token("s3cret", &reset), Err(AuthError::InvalidToken(_))));

        let session = issue_token("s3cret", "user_1", ADMIN_ACTOR, Duration::hours(1)).unwrap();
        assert!(matches!(
            decode_reset_token("s3cret", &session),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
