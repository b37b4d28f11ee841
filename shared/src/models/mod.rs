//! Domain models for the Mildew Risk Platform

mod outbreak;
mod risk;
mod treatment;
mod weather;

pub use outbreak::*;
pub use risk::*;
pub use treatment::*;
pub use weather::*;
