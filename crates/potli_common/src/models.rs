// --- File: crates/potli_common/src/models.rs ---

// Entities shared between the persistence layer and the feature crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form JSON object attached to customers, users and invites.
pub type Metadata = Map<String, Value>;

/// Opaque provider data stored on a payment session.
pub type PaymentData = Map<String, Value>;

/// Storefront homepage banner.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeroBanner {
    pub id: String,
    pub title: Option<String>,
    pub image_url: String,
    pub redirect_url: Option<String>,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storefront customer. Verification state lives in `metadata`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub has_account: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin dashboard user.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pending or accepted invitation to the admin dashboard.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invite {
    pub id: String,
    pub email: String,
    pub token: String,
    pub accepted: bool,
    pub expires_at: DateTime<Utc>,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of a payment session.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSessionStatus {
    Pending,
    Authorized,
    Captured,
    Canceled,
    Error,
    RequiresMore,
}

impl PaymentSessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentSessionStatus::Pending => "pending",
            PaymentSessionStatus::Authorized => "authorized",
            PaymentSessionStatus::Captured => "captured",
            PaymentSessionStatus::Canceled => "canceled",
            PaymentSessionStatus::Error => "error",
            PaymentSessionStatus::RequiresMore => "requires_more",
        }
    }

    /// Unknown strings map to `Pending`.
    pub fn parse(value: &str) -> Self {
        match value {
            "authorized" => PaymentSessionStatus::Authorized,
            "captured" => PaymentSessionStatus::Captured,
            "canceled" => PaymentSessionStatus::Canceled,
            "error" => PaymentSessionStatus::Error,
            "requires_more" => PaymentSessionStatus::RequiresMore,
            _ => PaymentSessionStatus::Pending,
        }
    }
}

impl std::fmt::Display for PaymentSessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One per cart; groups the payment sessions opened for it.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCollection {
    pub id: String,
    pub cart_id: String,
    pub region_id: Option<String>,
    pub currency_code: String,
    /// Minor units.
    pub amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    pub id: String,
    pub payment_collection_id: String,
    /// `pp_{identifier}_{identifier}`
    pub provider_id: String,
    pub amount: i64,
    pub currency_code: String,
    pub status: PaymentSessionStatus,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub data: PaymentData,
    pub authorized_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reads a metadata flag that may have been stored as `true` or `"true"`.
pub fn metadata_flag(metadata: &Metadata, key: &str) -> bool {
    match metadata.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_flag_accepts_bool_and_string() {
        let mut metadata = Metadata::new();
        assert!(!metadata_flag(&metadata, "email_verified"));
        metadata.insert("email_verified".into(), json!(true));
        assert!(metadata_flag(&metadata, "email_verified"));
        metadata.insert("email_verified".into(), json!("true"));
        assert!(metadata_flag(&metadata, "email_verified"));
        metadata.insert("email_verified".into(), json!("yes"));
        assert!(!metadata_flag(&metadata, "email_verified"));
    }

    #[test]
    fn test_session_status_serde() {
        let value = serde_json::to_value(PaymentSessionStatus::RequiresMore).unwrap();
        assert_eq!(value, json!("requires_more"));
        assert_eq!(PaymentSessionStatus::parse("captured"), PaymentSessionStatus::Captured);
        assert_eq!(PaymentSessionStatus::parse("bogus"), PaymentSessionStatus::Pending);
    }
}
