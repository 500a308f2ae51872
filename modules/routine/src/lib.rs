// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::model;

// === MODULE DEFINITION ===
pub mod module;
pub use module::Routine;

pub mod config;

// === INTERNAL MODULES ===
// Exposed for integration tests and for callers wiring their own connection
// (e.g. a transaction); the contract and `domain::repo` are the stable surface.
pub mod domain;
#[doc(hidden)]
pub mod infra;
