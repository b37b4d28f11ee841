//! Validation utilities for the Mildew Risk Platform
//!
//! Weather observations are rejected at the boundary: the analysis core
//! only ever sees complete, physically plausible records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Why an observation could not become a `WeatherRecord`
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("{date}: missing required field `{field}`")]
    MissingField { date: NaiveDate, field: &'static str },

    #[error("{date}: field `{field}` out of range: {reason}")]
    OutOfRange {
        date: NaiveDate,
        field: &'static str,
        reason: &'static str,
    },
}

impl RecordError {
    pub fn field(&self) -> &'static str {
        match self {
            RecordError::MissingField { field, .. } => field,
            RecordError::OutOfRange { field, .. } => field,
        }
    }
}

// ============================================================================
// Measurement Validations
// ============================================================================

/// Precipitation sums cannot be negative
pub fn validate_precipitation(precipitation_mm: Decimal) -> Result<(), &'static str> {
    if precipitation_mm < Decimal::ZERO {
        return Err("Precipitation cannot be negative");
    }
    Ok(())
}

/// Relative humidity is a percentage
pub fn validate_humidity(humidity_pct: Decimal) -> Result<(), &'static str> {
    if humidity_pct < Decimal::ZERO || humidity_pct > Decimal::from(100) {
        return Err("Relative humidity must be between 0 and 100%");
    }
    Ok(())
}

// ============================================================================
// Location Validations
// ============================================================================

pub fn validate_latitude(latitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    Ok(())
}

pub fn validate_longitude(longitude: Decimal) -> Result<(), &'static str> {
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}
