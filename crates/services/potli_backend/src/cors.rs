// --- File: crates/services/potli_backend/src/cors.rs ---
use http::HeaderValue;
use potli_config::split_origins;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

/// CORS for one surface (store, admin or auth) from a comma separated
/// origin list. Credentials are allowed, so methods and headers are mirrored
/// instead of wildcarded.
pub fn cors_layer(origins: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = split_origins(origins)
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(Duration::from_secs(60 * 60))
}
