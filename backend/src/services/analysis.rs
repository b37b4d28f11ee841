//! Analysis service tying weather sources to the risk analysis core

use chrono::NaiveDate;
use shared::{
    records_from_observations, DailyObservation, DateRange, GpsCoordinates, RiskAnalysis,
    TreatmentLedger, WeatherRecord,
};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::weather::WeatherClient;

/// Where the weather for an analysis comes from
#[derive(Debug, Clone)]
pub struct LocationRequest {
    pub location: GpsCoordinates,
    pub days_back: Option<u32>,
    pub include_forecast: bool,
}

/// Analysis service
#[derive(Clone)]
pub struct AnalysisService {
    config: Config,
    weather_client: Option<WeatherClient>,
}

impl AnalysisService {
    /// Service for analysing uploaded observations only
    pub fn new(config: Config) -> Self {
        Self {
            config,
            weather_client: None,
        }
    }

    /// Service that can also fetch weather by location
    pub fn with_client(config: Config, weather_client: WeatherClient) -> Self {
        Self {
            config,
            weather_client: Some(weather_client),
        }
    }

    /// Analyse observations supplied by the caller
    pub fn analyze_observations(
        &self,
        observations: &[DailyObservation],
        ledger: &TreatmentLedger,
    ) -> AppResult<RiskAnalysis> {
        let records =
            records_from_observations(observations, self.config.weather.humidity_backfill_pct)
                .map_err(|e| {
                    tracing::warn!("Rejected weather observation: {}", e);
                    AppError::from(e)
                })?;

        Ok(self.analyze_records(records, ledger))
    }

    /// Analyse records that are already validated, e.g. from a CSV export
    pub fn analyze_records(
        &self,
        records: Vec<WeatherRecord>,
        ledger: &TreatmentLedger,
    ) -> RiskAnalysis {
        let analysis = RiskAnalysis::run(records, ledger, self.config.analysis.strategy);
        tracing::debug!(
            "Analysed {} days: {} outbreak windows, {} recommendations",
            analysis.days.len(),
            analysis.outbreaks.len(),
            analysis.recommendations.len()
        );
        analysis
    }

    /// Resolve the date range for a location request
    pub fn date_range(&self, request: &LocationRequest, today: NaiveDate) -> AppResult<DateRange> {
        let analysis = &self.config.analysis;
        let days_back = request.days_back.unwrap_or(analysis.default_days_back);
        if days_back == 0 || days_back > analysis.max_days_back {
            return Err(AppError::Validation {
                field: "days_back".to_string(),
                message: format!("days_back must be between 1 and {}", analysis.max_days_back),
                message_es: format!(
                    "days_back debe estar entre 1 y {}",
                    analysis.max_days_back
                ),
            });
        }

        let forecast_days = if request.include_forecast {
            analysis.forecast_days
        } else {
            0
        };
        Ok(DateRange::lookback(today, days_back, forecast_days))
    }

    /// Fetch weather for a location and analyse it
    pub async fn analyze_location(
        &self,
        request: &LocationRequest,
        ledger: &TreatmentLedger,
        today: NaiveDate,
    ) -> AppResult<RiskAnalysis> {
        let range = self.date_range(request, today)?;

        let client = self.weather_client.as_ref().ok_or_else(|| {
            AppError::Configuration("Weather client not configured".to_string())
        })?;
        let observations = client
            .get_daily_observations(&request.location, range)
            .await?;

        self.analyze_observations(&observations, ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::RiskTier;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn observation(day: u32, humidity: Option<i64>) -> DailyObservation {
        DailyObservation {
            date: date(day),
            temperature_max_c: Some(Decimal::from(16)),
            temperature_min_c: Some(Decimal::from(10)),
            mean_temperature_c: None,
            precipitation_mm: Some(Decimal::from(12)),
            relative_humidity_pct: humidity.map(Decimal::from),
        }
    }

    fn request(days_back: Option<u32>, include_forecast: bool) -> LocationRequest {
        LocationRequest {
            location: GpsCoordinates::new(Decimal::new(4246, 2), Decimal::new(-244, 2)),
            days_back,
            include_forecast,
        }
    }

    #[test]
    fn test_analyze_observations() {
        let service = AnalysisService::new(Config::default());
        let observations = vec![observation(1, Some(95)), observation(2, Some(60))];
        let analysis = service
            .analyze_observations(&observations, &TreatmentLedger::new())
            .unwrap();
        assert_eq!(analysis.days[0].tier, RiskTier::High);
        assert_eq!(analysis.days[1].tier, RiskTier::Medium);
    }

    #[test]
    fn test_missing_humidity_rejected_by_default() {
        let service = AnalysisService::new(Config::default());
        let result = service.analyze_observations(&[observation(1, None)], &TreatmentLedger::new());
        assert!(matches!(result, Err(AppError::InvalidRecord(_))));
    }

    #[test]
    fn test_missing_humidity_backfilled_when_configured() {
        let mut config = Config::default();
        config.weather.humidity_backfill_pct = Some(Decimal::from(90));
        let service = AnalysisService::new(config);
        let analysis = service
            .analyze_observations(&[observation(1, None)], &TreatmentLedger::new())
            .unwrap();
        assert_eq!(analysis.days[0].tier, RiskTier::High);
    }

    #[test]
    fn test_date_range_defaults_and_forecast() {
        let service = AnalysisService::new(Config::default());
        let range = service.date_range(&request(None, false), date(20)).unwrap();
        assert_eq!(range.start, date(13));
        assert_eq!(range.end, date(20));

        let range = service.date_range(&request(Some(2), true), date(20)).unwrap();
        assert_eq!(range.start, date(18));
        assert_eq!(range.end, date(23));
    }

    #[test]
    fn test_date_range_bounds() {
        let service = AnalysisService::new(Config::default());
        assert!(service.date_range(&request(Some(0), false), date(20)).is_err());
        assert!(service.date_range(&request(Some(15), false), date(20)).is_err());
        assert!(service.date_range(&request(Some(14), false), date(20)).is_ok());
    }

    #[tokio::test]
    async fn test_location_requires_client() {
        let service = AnalysisService::new(Config::default());
        let result = service
            .analyze_location(&request(None, false), &TreatmentLedger::new(), date(20))
            .await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_location_days_back_checked_before_fetch() {
        let config = Config::default();
        let client = WeatherClient::new(&config.weather);
        let service = AnalysisService::with_client(config, client);
        let result = service
            .analyze_location(&request(Some(30), false), &TreatmentLedger::new(), date(20))
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
