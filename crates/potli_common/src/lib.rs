// --- File: crates/potli_common/src/lib.rs ---

pub mod cache;     // TTL cache for hot reads
pub mod error;     // Error handling
pub mod events;    // Domain event bus
pub mod features;  // Feature flag handling
pub mod http;      // HTTP utilities
pub mod logging;   // Logging utilities
pub mod models;    // Shared entities
pub mod services;  // Provider contracts

pub use error::{config_error, external_service_error, HttpStatusCode, PotliError};

pub use http::{
    client::{create_client, HTTP_CLIENT},
    failure_response,
    message_response,
    JsonResponse,
};

pub use logging::{init, init_with_level, LoggingGuard};

pub use events::{DomainEvent, EventBus};

pub use features::is_feature_enabled;

#[cfg(feature = "razorpay")]
pub use features::is_razorpay_enabled;

#[cfg(feature = "r2")]
pub use features::is_r2_enabled;

#[cfg(feature = "resend")]
pub use features::is_resend_enabled;

#[cfg(feature = "hero_banner")]
pub use features::is_hero_banner_enabled;

#[cfg(feature = "email_verification")]
pub use features::is_email_verification_enabled;

#[cfg(feature = "settings_access")]
pub use features::is_settings_access_enabled;
