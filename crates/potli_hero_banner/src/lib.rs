// --- File: crates/potli_hero_banner/src/lib.rs ---

pub mod doc;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod service;

#[cfg(test)]
mod service_test;

pub use error::HeroBannerError;
pub use handlers::HeroBannerState;
pub use routes::{admin_routes, store_routes};
pub use service::{BannerOrder, CreateHeroBanner, HeroBannerService, UpdateHeroBanner, ACTIVE_CACHE_KEY};
