// --- File: crates/services/potli_backend/src/app.rs ---
use crate::app_state::AppState;
use crate::cors::cors_layer;
use crate::site;
use axum::{middleware, Router};
use potli_auth::{authenticate, require_admin, AuthState};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[cfg(feature = "settings_access")]
use potli_access::{require_settings_access, AccessState, InviteService, SettingsGate};
#[cfg(feature = "settings_access")]
use potli_db::SqlUserRepository;

/// Store, admin and auth surfaces each get their own CORS policy. Admin
/// routes additionally require an admin token; every request passes through
/// [`authenticate`] first so handlers can read the caller from extensions.
pub fn build_router(state: &AppState) -> Router {
    let config = state.config.clone();
    let auth_state = Arc::new(AuthState::new(
        config.clone(),
        state.db.clone(),
        state.events.clone(),
    ));

    // --- Store ---
    #[allow(unused_mut)]
    let mut store = site::store_routes()
        .merge(potli_auth::store_routes(auth_state.clone()))
        .merge(potli_payment::store_routes(state.payments.clone()));

    // Mounted only when the provider was actually registered.
    #[cfg(feature = "razorpay")]
    if state
        .payments
        .provider(&potli_payment::provider_id_for(
            potli_razorpay::RazorpayProviderService::IDENTIFIER,
        ))
        .is_ok()
    {
        store = store.merge(potli_razorpay::routes(config.clone(), state.payments.clone()));
    }

    #[cfg(feature = "hero_banner")]
    if let Some(banners) = state.hero_banners.clone() {
        store = store.merge(potli_hero_banner::store_routes(config.clone(), banners));
    }

    // --- Admin ---
    #[allow(unused_mut)]
    let mut admin = potli_payment::admin_routes(state.payments.clone());

    #[cfg(feature = "hero_banner")]
    if let Some(banners) = state.hero_banners.clone() {
        let files = state.service_factory.file_provider();
        admin = admin.merge(potli_hero_banner::admin_routes(config.clone(), banners, files));
    }

    #[allow(unused_mut)]
    let mut admin = admin.layer(middleware::from_fn(require_admin));

    #[cfg(feature = "settings_access")]
    {
        let access = Arc::new(AccessState {
            config: config.clone(),
            gate: SettingsGate::new(
                &config.settings_access.allowed_emails,
                SqlUserRepository::new(state.db.clone()),
            ),
            invites: InviteService::new(state.db.clone(), state.events.clone()),
        });

        let mut restricted = potli_access::admin_routes(access.clone());
        if potli_common::is_settings_access_enabled(&config) {
            tracing::info!("✅ Settings access gate active");
            restricted = restricted.layer(middleware::from_fn_with_state(
                access.clone(),
                require_settings_access,
            ));
        }
        admin = admin
            .merge(restricted.layer(middleware::from_fn(require_admin)))
            .merge(potli_access::public_routes(access));
    }

    let store = store.layer(cors_layer(&config.http.store_cors));
    let admin = admin.layer(cors_layer(&config.http.admin_cors));
    let auth = potli_auth::auth_routes(auth_state).layer(cors_layer(&config.http.auth_cors));

    Router::new()
        .merge(store)
        .merge(admin)
        .merge(auth)
        .merge(site::site_routes(config.clone()))
        .layer(middleware::from_fn_with_state(config, authenticate))
        .layer(TraceLayer::new_for_http())
}
