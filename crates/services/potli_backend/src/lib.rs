// --- File: crates/services/potli_backend/src/lib.rs ---
//! Wiring for the Potli server: shared state, provider factory and the
//! router that stitches the feature crates together.

pub mod app;
pub mod app_state;
pub mod cors;
pub mod service_factory;
pub mod site;

pub use app::build_router;
pub use app_state::AppState;
pub use service_factory::PotliServiceFactory;
