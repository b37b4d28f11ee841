//! Common types used across the platform

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates of a vineyard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Inclusive date range for weather queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Look back `days_back` days from `today`, optionally extending
    /// `forecast_days` into the future.
    pub fn lookback(today: NaiveDate, days_back: u32, forecast_days: u32) -> Self {
        Self {
            start: today - Duration::days(i64::from(days_back)),
            end: today + Duration::days(i64::from(forecast_days)),
        }
    }

    /// Number of calendar days covered, both ends included
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
