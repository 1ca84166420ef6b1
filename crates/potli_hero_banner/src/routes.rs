// --- File: crates/potli_hero_banner/src/routes.rs ---

use crate::handlers::{
    create_banner_handler, delete_banner_handler, get_banner_handler, list_banners_handler,
    reorder_banners_handler, store_banners_handler, update_banner_handler,
    upload_banner_image_handler, HeroBannerState,
};
use crate::service::HeroBannerService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use potli_common::services::SharedFileProvider;
use potli_config::AppConfig;
use std::sync::Arc;

/// Admin banner management. The caller layers admin authentication on top.
pub fn admin_routes(
    config: Arc<AppConfig>,
    banners: Arc<HeroBannerService>,
    files: Option<SharedFileProvider>,
) -> Router {
    // Oversized files must reach the handler to get the size message.
    let body_limit = config.hero_banner.max_upload_bytes.saturating_mul(2);
    let state = Arc::new(HeroBannerState {
        config,
        banners,
        files,
    });

    Router::new()
        .route(
            "/admin/hero-banners",
            get(list_banners_handler).post(create_banner_handler),
        )
        .route("/admin/hero-banners/batch", patch(reorder_banners_handler))
        .route(
            "/admin/hero-banners/upload",
            post(upload_banner_image_handler).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/admin/hero-banners/{id}",
            get(get_banner_handler)
                .patch(update_banner_handler)
                .delete(delete_banner_handler),
        )
        .with_state(state)
}

pub fn store_routes(config: Arc<AppConfig>, banners: Arc<HeroBannerService>) -> Router {
    let state = Arc::new(HeroBannerState {
        config,
        banners,
        files: None,
    });

    Router::new()
        .route("/store/hero-banners", get(store_banners_handler))
        .with_state(state)
}
