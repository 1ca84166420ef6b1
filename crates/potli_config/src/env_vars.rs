//! Environment variable handling for the Potli backend.
//!
//! Configuration keys can be supplied as `POTLI__SECTION__KEY`, secrets as
//! `POTLI_SECRET_SECTION_KEY` or with the flat legacy names used by the
//! vendor SDKs (`RAZORPAY_KEY_SECRET`, `R2_BUCKET`, ...).

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "POTLI";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "POTLI_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path (`server.host`) to `POTLI__SERVER__HOST`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path (`razorpay.key_secret`) to `POTLI_SECRET_RAZORPAY_KEY_SECRET`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to its flat vendor name, e.g. `RAZORPAY_KEY_SECRET`.
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Strips a UTF-8 byte-order mark and surrounding whitespace.
///
/// Values pasted from dashboards into `.env` files regularly carry both.
pub fn normalize_env_value(raw: &str) -> Option<String> {
    let value = raw.trim_start_matches('\u{feff}').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Reads and normalizes an environment variable; blank values count as unset.
pub fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().and_then(|v| normalize_env_value(&v))
}

pub fn get_config_env_var(path: &str) -> Option<String> {
    env_value(&config_path_to_env_var(path))
}

/// Looks up a secret under the prefixed name first, then the legacy flat name.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    if let Some(value) = env_value(&secret_path_to_env_var(path)) {
        return Some(value);
    }
    env_value(&legacy_secret_path_to_env_var(path))
}

/// Paths containing "secret", "key", "password" or "token" are treated as secrets.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("key")
        || path_lower.contains("password")
        || path_lower.contains("token")
}

pub fn get_env_var(path: &str) -> Option<String> {
    if is_secret_path(path) {
        get_secret_env_var(path)
    } else {
        get_config_env_var(path)
    }
}

/// Replaces every `"secret_from_env"` string in `value` with its environment value.
///
/// Returns `true` if anything was replaced.
pub fn inject_env_vars(value: &mut serde_json::Value) -> bool {
    inject_with(value, &get_env_var)
}

pub(crate) fn inject_with(
    value: &mut serde_json::Value,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> bool {
    use serde_json::Value;

    fn walk(path: Vec<String>, obj: &mut Value, lookup: &dyn Fn(&str) -> Option<String>) -> bool {
        let mut replaced = false;

        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    replaced |= walk(new_path, v, lookup);
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    let mut new_path = path.clone();
                    new_path.push(i.to_string());
                    replaced |= walk(new_path, v, lookup);
                }
            }
            Value::String(s) if s == "secret_from_env" => {
                let path_str = path.join(".");
                if let Some(env_val) = lookup(&path_str) {
                    *s = env_val;
                    replaced = true;
                } else {
                    tracing::warn!("env var for {} not found", path_str);
                }
            }
            _ => {}
        }

        replaced
    }

    walk(vec![], value, lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_path_to_env_var() {
        assert_eq!(config_path_to_env_var("server.host"), "POTLI__SERVER__HOST");
        assert_eq!(config_path_to_env_var("database.url"), "POTLI__DATABASE__URL");
    }

    #[test]
    fn test_secret_path_to_env_var() {
        assert_eq!(
            secret_path_to_env_var("razorpay.key_secret"),
            "POTLI_SECRET_RAZORPAY_KEY_SECRET"
        );
    }

    #[test]
    fn test_legacy_secret_path_to_env_var() {
        assert_eq!(
            legacy_secret_path_to_env_var("razorpay.key_secret"),
            "RAZORPAY_KEY_SECRET"
        );
        assert_eq!(
            legacy_secret_path_to_env_var("r2.secret_access_key"),
            "R2_SECRET_ACCESS_KEY"
        );
        assert_eq!(legacy_secret_path_to_env_var("token"), "TOKEN");
    }

    #[test]
    fn test_is_secret_path() {
        assert!(is_secret_path("razorpay.key_secret"));
        assert!(is_secret_path("resend.api_key"));
        assert!(is_secret_path("http.jwt_secret"));
        assert!(!is_secret_path("server.host"));
        assert!(!is_secret_path("database.url"));
    }

    #[test]
    fn test_normalize_env_value() {
        assert_eq!(normalize_env_value("\u{feff}  abc \n"), Some("abc".to_string()));
        assert_eq!(normalize_env_value("   "), None);
        assert_eq!(normalize_env_value("x"), Some("x".to_string()));
    }

    #[test]
    fn test_inject_with_replaces_markers() {
        let mut value = json!({
            "razorpay": { "key_id": "rzp_test", "key_secret": "secret_from_env" },
            "r2": { "bucket": "secret_from_env" }
        });
        let lookup = |path: &str| match path {
            "razorpay.key_secret" => Some("shh".to_string()),
            _ => None,
        };

        assert!(inject_with(&mut value, &lookup));
        assert_eq!(value["razorpay"]["key_secret"], "shh");
        assert_eq!(value["razorpay"]["key_id"], "rzp_test");
        // unresolved markers are left alone
        assert_eq!(value["r2"]["bucket"], "secret_from_env");
    }
}
