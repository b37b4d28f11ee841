//! Weather API client for fetching daily weather series
//!
//! Integrates with the Open-Meteo forecast API, which serves both recent
//! past days and short-range forecasts without an API key.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{DailyObservation, DateRange, GpsCoordinates};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

const DAILY_VARIABLES: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,relative_humidity_2m_max";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    timezone: String,
}

/// Open-Meteo response; only the daily block is requested
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    daily: OpenMeteoDaily,
}

/// Column-oriented daily aggregates, one entry per day in `time`
#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    time: Vec<NaiveDate>,
    temperature_2m_max: Vec<Option<Decimal>>,
    temperature_2m_min: Vec<Option<Decimal>>,
    precipitation_sum: Vec<Option<Decimal>>,
    #[serde(default)]
    relative_humidity_2m_max: Vec<Option<Decimal>>,
}

impl WeatherClient {
    /// Create a new WeatherClient from configuration
    pub fn new(config: &WeatherConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: config.api_endpoint.clone(),
            timezone: config.timezone.clone(),
        }
    }

    /// Create a new WeatherClient against another Open-Meteo compatible endpoint
    pub fn with_base_url(base_url: String, timezone: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            timezone,
        }
    }

    /// Fetch daily observations for a location and date range
    pub async fn get_daily_observations(
        &self,
        location: &GpsCoordinates,
        range: DateRange,
    ) -> AppResult<Vec<DailyObservation>> {
        tracing::info!(
            "Fetching weather for ({}, {}) from {} to {}",
            location.latitude,
            location.longitude,
            range.start,
            range.end
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("start_date", range.start.to_string()),
                ("end_date", range.end.to_string()),
                ("daily", DAILY_VARIABLES.to_string()),
                ("timezone", self.timezone.clone()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Weather API request failed: {}", e);
                AppError::WeatherServiceUnavailable
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OpenMeteoResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse weather response: {}", e))
        })?;

        convert_daily_response(data.daily)
    }
}

/// Zip the daily columns into one observation per day
fn convert_daily_response(daily: OpenMeteoDaily) -> AppResult<Vec<DailyObservation>> {
    let days = daily.time.len();
    let column_ok = |len: usize| len == days;
    if !column_ok(daily.temperature_2m_max.len())
        || !column_ok(daily.temperature_2m_min.len())
        || !column_ok(daily.precipitation_sum.len())
    {
        return Err(AppError::ExternalService(
            "Weather API returned columns of different lengths".to_string(),
        ));
    }

    let observations = daily
        .time
        .iter()
        .enumerate()
        .map(|(i, &date)| DailyObservation {
            date,
            temperature_max_c: daily.temperature_2m_max[i],
            temperature_min_c: daily.temperature_2m_min[i],
            mean_temperature_c: None,
            precipitation_mm: daily.precipitation_sum[i],
            relative_humidity_pct: daily.relative_humidity_2m_max.get(i).copied().flatten(),
        })
        .collect();

    Ok(observations)
}
