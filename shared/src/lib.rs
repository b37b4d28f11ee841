//! Shared types and models for the Mildew Risk Platform
//!
//! This crate holds the downy mildew analysis core: per-day risk
//! classification, outbreak detection, treatment scheduling and the
//! session treatment ledger. It performs no I/O and is shared between the
//! backend and the browser (via WASM).

pub mod analysis;
pub mod models;
pub mod types;
pub mod validation;

pub use analysis::*;
pub use models::*;
pub use types::*;
pub use validation::*;
