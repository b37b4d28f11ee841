//! HTTP handlers for the Mildew Risk Platform

pub mod analysis;
pub mod health;
pub mod session;

pub use analysis::*;
pub use health::*;
pub use session::*;
