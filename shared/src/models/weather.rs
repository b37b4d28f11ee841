//! Weather data models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{validate_humidity, validate_precipitation, RecordError};

/// A raw daily observation as supplied by a weather source.
///
/// Every measurement is optional here; `WeatherRecord::from_observation`
/// decides what is acceptable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_max_c: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_min_c: Option<Decimal>,
    /// Pre-averaged mean; takes precedence over max/min when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_temperature_c: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_mm: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_humidity_pct: Option<Decimal>,
}

/// One calendar day's measurements, complete and validated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub mean_temperature_c: Decimal,
    pub precipitation_mm: Decimal,
    pub relative_humidity_pct: Decimal,
}

impl WeatherRecord {
    pub fn new(
        date: NaiveDate,
        mean_temperature_c: Decimal,
        precipitation_mm: Decimal,
        relative_humidity_pct: Decimal,
    ) -> Self {
        Self {
            date,
            mean_temperature_c,
            precipitation_mm,
            relative_humidity_pct,
        }
    }

    /// Build a record from a raw observation.
    ///
    /// The mean temperature is `(max + min) / 2` unless a mean is supplied.
    /// Missing humidity is replaced by `humidity_backfill` when the caller
    /// opts into backfilling; any other missing field is rejected.
    pub fn from_observation(
        obs: &DailyObservation,
        humidity_backfill: Option<Decimal>,
    ) -> Result<Self, RecordError> {
        let date = obs.date;
        let missing = |field| RecordError::MissingField { date, field };

        let mean_temperature_c = match obs.mean_temperature_c {
            Some(mean) => mean,
            None => {
                let max = obs.temperature_max_c.ok_or_else(|| missing("temperature_max_c"))?;
                let min = obs.temperature_min_c.ok_or_else(|| missing("temperature_min_c"))?;
                (max + min) / Decimal::from(2)
            }
        };

        let precipitation_mm = obs.precipitation_mm.ok_or_else(|| missing("precipitation_mm"))?;
        validate_precipitation(precipitation_mm).map_err(|reason| RecordError::OutOfRange {
            date,
            field: "precipitation_mm",
            reason,
        })?;

        let relative_humidity_pct = obs
            .relative_humidity_pct
            .or(humidity_backfill)
            .ok_or_else(|| missing("relative_humidity_pct"))?;
        validate_humidity(relative_humidity_pct).map_err(|reason| RecordError::OutOfRange {
            date,
            field: "relative_humidity_pct",
            reason,
        })?;

        Ok(Self::new(
            date,
            mean_temperature_c,
            precipitation_mm,
            relative_humidity_pct,
        ))
    }
}

/// Convert a batch of observations, stopping at the first rejected one
pub fn records_from_observations(
    observations: &[DailyObservation],
    humidity_backfill: Option<Decimal>,
) -> Result<Vec<WeatherRecord>, RecordError> {
    observations
        .iter()
        .map(|obs| WeatherRecord::from_observation(obs, humidity_backfill))
        .collect()
}
