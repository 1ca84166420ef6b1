use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod env_vars;
pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Layers, lowest precedence first:
/// 1. `config/default.{toml,json,yaml}` (optional)
/// 2. `config/{RUN_ENV}` (optional, `RUN_ENV` defaults to `debug`)
/// 3. `POTLI__SECTION__KEY` environment variables
/// 4. `"secret_from_env"` markers resolved from the environment
/// 5. the flat variables operators already know (`PORT`, `DATABASE_URL`,
///    `RAZORPAY_KEY_ID`, `R2_BUCKET`, ...)
///
/// The config directory can be moved with `CONFIG_DIR`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    let config = apply_env_overrides_from_marker(raw_config)?;
    let config = apply_well_known_env(config, &env_vars::env_value);
    validate_for_environment(&config, is_production())?;

    info!("✅ Configuration loaded (RUN_ENV={})", run_env);
    Ok(config)
}

/// Applies environment overrides based on "secret_from_env" markers in the serialized config.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|e| ConfigError::Message(format!("config is not serializable: {e}")))?;
    env_vars::inject_env_vars(&mut json);
    serde_json::from_value(json)
        .map_err(|e| ConfigError::Message(format!("config is no longer deserializable: {e}")))
}

/// Overlays the flat environment variables onto `config`.
///
/// `lookup` returns normalized values; blank variables must come back as `None`.
pub fn apply_well_known_env(
    mut config: AppConfig,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> AppConfig {
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!("Ignoring invalid PORT value '{}'", port),
        }
    }
    if let Some(url) = lookup("DATABASE_URL") {
        config.database = Some(DatabaseConfig { url });
    }

    if let Some(v) = lookup("STORE_CORS") {
        config.http.store_cors = v;
    }
    if let Some(v) = lookup("ADMIN_CORS") {
        config.http.admin_cors = v;
    }
    if let Some(v) = lookup("AUTH_CORS") {
        config.http.auth_cors = v;
    }
    if let Some(v) = lookup("JWT_SECRET") {
        config.http.jwt_secret = v;
    }
    if let Some(v) = lookup("COOKIE_SECRET") {
        config.http.cookie_secret = v;
    }

    if let Some(v) = lookup("BACKEND_URL") {
        config.urls.backend_url = v;
    }
    if let Some(v) = lookup("FRONTEND_URL") {
        config.urls.frontend_url = Some(v);
    }
    if let Some(v) = lookup("FRONTEND_VERIFY_REDIRECT_PATH") {
        config.urls.frontend_verify_redirect_path = v;
    }
    if let Some(v) = lookup("EMAIL_FROM") {
        config.urls.email_from = v;
    }

    if let Some(list) = lookup("ALLOWED_SETTINGS_ACCESS_EMAILS") {
        config.settings_access.allowed_emails = list
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
    }

    let key_id = lookup("RAZORPAY_KEY_ID");
    let key_secret = lookup("RAZORPAY_KEY_SECRET");
    let webhook_secret = lookup("RAZORPAY_WEBHOOK_SECRET");
    if key_id.is_some() || key_secret.is_some() || webhook_secret.is_some() {
        let razorpay = config.razorpay.get_or_insert_with(RazorpayConfig::default);
        if let Some(v) = key_id {
            razorpay.key_id = v;
        }
        if let Some(v) = key_secret {
            razorpay.key_secret = v;
        }
        if webhook_secret.is_some() {
            razorpay.webhook_secret = webhook_secret;
        }
    }

    let r2_vars = [
        "R2_ACCESS_KEY_ID",
        "R2_SECRET_ACCESS_KEY",
        "R2_BUCKET",
        "R2_ENDPOINT",
        "R2_PUBLIC_URL",
    ]
    .map(|name| lookup(name));
    if r2_vars.iter().any(Option::is_some) {
        let r2 = config.r2.get_or_insert_with(R2Config::default);
        let [access_key_id, secret_access_key, bucket, endpoint, public_url] = r2_vars;
        if let Some(v) = access_key_id {
            r2.access_key_id = v;
        }
        if let Some(v) = secret_access_key {
            r2.secret_access_key = v;
        }
        if let Some(v) = bucket {
            r2.bucket = v;
        }
        if let Some(v) = endpoint {
            r2.endpoint = v;
        }
        if let Some(v) = public_url {
            r2.public_url = v;
        }
    }

    if let Some(api_key) = lookup("RESEND_API_KEY") {
        let resend = config.resend.get_or_insert_with(ResendConfig::default);
        resend.api_key = api_key;
    }
    // The sender address is shared between the email module and the provider.
    if let Some(resend) = config.resend.as_mut() {
        if resend.from.is_empty() {
            resend.from = config.urls.email_from.clone();
        }
    }

    config
}

/// `RUN_ENV` or `NODE_ENV` set to `production`.
pub fn is_production() -> bool {
    ["RUN_ENV", "NODE_ENV"]
        .iter()
        .any(|name| env::var(name).map(|v| v == "production").unwrap_or(false))
}

/// Refuses to start a production server on the development secrets.
pub fn validate_for_environment(config: &AppConfig, production: bool) -> Result<(), ConfigError> {
    if !production {
        return Ok(());
    }
    for (name, value) in [
        ("JWT_SECRET", &config.http.jwt_secret),
        ("COOKIE_SECRET", &config.http.cookie_secret),
    ] {
        if value.is_empty() || value == DEFAULT_SECRET {
            return Err(ConfigError::Message(format!(
                "{name} must be set in production"
            )));
        }
    }
    Ok(())
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

fn flag_enabled(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim),
        Some("1") | Some("true") | Some("TRUE") | Some("yes")
    )
}

/// Loads `.env` exactly once. Variables already present in the process
/// environment win unless `DOTENV_OVERRIDE=1`.
pub fn ensure_dotenv_loaded() {
    INIT_DOTENV.get_or_init(|| {
        let override_existing = flag_enabled(env::var("DOTENV_OVERRIDE").ok());
        load_dotenv_file(Path::new(".env"), override_existing);
    });
}

/// Returns how many variables were applied; a missing file applies none.
fn load_dotenv_file(path: &Path, override_existing: bool) -> usize {
    let iter = match dotenv::from_path_iter(path) {
        Ok(iter) => iter,
        Err(_) => return 0,
    };
    let mut applied = 0;
    for item in iter {
        match item {
            Ok((key, value)) => {
                if override_existing || env::var_os(&key).is_none() {
                    env::set_var(&key, value);
                    applied += 1;
                }
            }
            Err(e) => warn!("Skipping malformed line in {}: {}", path.display(), e),
        }
    }
    applied
}
