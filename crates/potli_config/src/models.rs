// --- File: crates/potli_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fallback used for `JWT_SECRET` and `COOKIE_SECRET` outside production.
pub const DEFAULT_SECRET: &str = "supersecret";

pub const DEFAULT_STORE_CORS: &str =
    "http://localhost:3000,http://127.0.0.1:3000,http://localhost:5173,http://127.0.0.1:5173";
pub const DEFAULT_ADMIN_CORS: &str = "http://localhost:9000";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:9000";
pub const DEFAULT_EMAIL_FROM: &str = "noreply@techpotli.com";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding static assets such as `mn.png`.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

fn default_public_dir() -> String {
    "public".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9000,
            public_dir: default_public_dir(),
        }
    }
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite://data/potli.db, loaded via DATABASE_URL
}

// --- HTTP surface: CORS and secrets ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    /// Comma separated origins allowed on `/store` routes.
    pub store_cors: String,
    /// Comma separated origins allowed on `/admin` routes.
    pub admin_cors: String,
    /// Comma separated origins allowed on `/auth` routes.
    pub auth_cors: String,
    pub jwt_secret: String,
    pub cookie_secret: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            store_cors: DEFAULT_STORE_CORS.to_string(),
            admin_cors: DEFAULT_ADMIN_CORS.to_string(),
            auth_cors: format!("{},{}", DEFAULT_STORE_CORS, DEFAULT_ADMIN_CORS),
            jwt_secret: DEFAULT_SECRET.to_string(),
            cookie_secret: DEFAULT_SECRET.to_string(),
        }
    }
}

/// Splits a comma separated origin list, dropping blanks.
pub fn split_origins(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// --- Public URLs used in links and redirects ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UrlConfig {
    pub backend_url: String,
    /// Storefront URL. Consumers pick their own fallback when unset.
    pub frontend_url: Option<String>,
    /// Path on the storefront that email verification redirects to.
    pub frontend_verify_redirect_path: String,
    pub email_from: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            frontend_url: None,
            frontend_verify_redirect_path: "/in/account".to_string(),
            email_from: DEFAULT_EMAIL_FROM.to_string(),
        }
    }
}

impl UrlConfig {
    pub fn frontend_url_or(&self, fallback: &str) -> String {
        self.frontend_url
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Backend URL without a trailing slash.
    pub fn backend_base(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}

// --- Razorpay Config ---
// key_secret and webhook_secret are expected from RAZORPAY_KEY_SECRET / RAZORPAY_WEBHOOK_SECRET.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RazorpayConfig {
    #[serde(default)]
    pub key_id: String,
    #[serde(default)]
    pub key_secret: String,
    #[serde(default)]
    pub webhook_secret: Option<String>,
    /// Overrides `https://api.razorpay.com/v1`.
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub default_currency: Option<String>,
}

// --- R2 Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct R2Config {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub endpoint: String,
    pub public_url: String,
}

// --- Resend Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HtmlTemplate {
    #[serde(default)]
    pub subject: Option<String>,
    pub content: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ResendConfig {
    pub api_key: String,
    pub from: String,
    /// Overrides `https://api.resend.com`.
    pub api_base_url: Option<String>,
    /// Per-template overrides keyed by template name.
    pub html_templates: HashMap<String, HtmlTemplate>,
}

// --- Hero banner module ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HeroBannerConfig {
    pub cache_ttl_secs: u64,
    pub max_upload_bytes: usize,
}

impl Default for HeroBannerConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

// --- Users / Developer settings gate ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct SettingsAccessConfig {
    /// Lower-cased emails that always pass the gate.
    pub allowed_emails: Vec<String>,
}

// --- Application Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_razorpay: bool,
    #[serde(default)]
    pub use_r2: bool,
    #[serde(default)]
    pub use_resend: bool,
    #[serde(default)]
    pub use_hero_banners: bool,
    #[serde(default)]
    pub use_email_verification: bool,
    #[serde(default)]
    pub use_settings_access: bool,

    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub urls: UrlConfig,
    #[serde(default)]
    pub hero_banner: HeroBannerConfig,
    #[serde(default)]
    pub settings_access: SettingsAccessConfig,

    // --- Optional vendor sections ---
    #[serde(default)]
    pub razorpay: Option<RazorpayConfig>,
    #[serde(default)]
    pub r2: Option<R2Config>,
    #[serde(default)]
    pub resend: Option<ResendConfig>,
}
