// --- File: crates/potli_r2/src/lib.rs ---

pub mod error;
pub mod logic;
pub mod service;

mod logic_proptest;

pub use error::R2Error;
pub use service::R2FileService;
