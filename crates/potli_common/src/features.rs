//! Feature flag handling.
//!
//! Every module is switched twice:
//!
//! 1. at compile time by the cargo feature of the backend (`razorpay`, `r2`,
//!    `resend`, `hero_banner`, `email_verification`, `settings_access`)
//! 2. at runtime by the `use_*` flag in [`AppConfig`], plus the presence of
//!    the module's config section where it has one
//!
//! The helpers below answer the runtime half.

use potli_config::AppConfig;
use std::sync::Arc;

/// `use_feature` is on and the feature's config section exists.
pub fn is_feature_enabled<T>(
    _config: &Arc<AppConfig>,
    use_feature: bool,
    feature_config: Option<&T>,
) -> bool {
    use_feature && feature_config.is_some()
}

#[cfg(feature = "razorpay")]
pub fn is_razorpay_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_razorpay, config.razorpay.as_ref())
}

#[cfg(feature = "r2")]
pub fn is_r2_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_r2, config.r2.as_ref())
}

#[cfg(feature = "resend")]
pub fn is_resend_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_resend, config.resend.as_ref())
}

/// Hero banners live in the database and have no vendor section.
#[cfg(feature = "hero_banner")]
pub fn is_hero_banner_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_hero_banners, config.database.as_ref())
}

#[cfg(feature = "email_verification")]
pub fn is_email_verification_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_email_verification, config.database.as_ref())
}

#[cfg(feature = "settings_access")]
pub fn is_settings_access_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_settings_access, config.database.as_ref())
}
