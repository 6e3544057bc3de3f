// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::model;

// === MODULE DEFINITION ===
pub mod config;
pub mod module;
pub use config::ItemsConfig;
pub use module::ItemsModule;

// === INTERNAL MODULES ===
// Exposed for integration tests; other crates should go through `contract`
// and `ItemsModule`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
