//! Business logic services for the Mildew Risk Platform

pub mod analysis;
pub mod export;
pub mod session;

pub use analysis::{AnalysisService, LocationRequest};
pub use export::ExportService;
pub use session::SessionService;
