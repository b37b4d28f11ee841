//! Tabular export of annotated days
//!
//! One CSV row per day. Every field of an annotated day is written, so an
//! export can be read back without loss.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{AnnotatedDay, DailyObservation, RecordError, RiskTier, WeatherRecord};

use crate::error::{AppError, AppResult};

/// Flat CSV row for one annotated day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub mean_temperature_c: Decimal,
    pub precipitation_mm: Decimal,
    pub relative_humidity_pct: Decimal,
    pub tier: RiskTier,
    pub rationale: String,
    pub treatment_applied: bool,
    pub treatment_suggested: bool,
}

impl From<&AnnotatedDay> for ExportRow {
    fn from(day: &AnnotatedDay) -> Self {
        Self {
            date: day.record.date,
            mean_temperature_c: day.record.mean_temperature_c,
            precipitation_mm: day.record.precipitation_mm,
            relative_humidity_pct: day.record.relative_humidity_pct,
            tier: day.tier,
            rationale: day.rationale.clone(),
            treatment_applied: day.treatment_applied,
            treatment_suggested: day.treatment_suggested,
        }
    }
}

/// Imported rows pass the same measurement checks as fresh observations
impl TryFrom<ExportRow> for AnnotatedDay {
    type Error = RecordError;

    fn try_from(row: ExportRow) -> Result<Self, Self::Error> {
        let observation = DailyObservation {
            date: row.date,
            temperature_max_c: None,
            temperature_min_c: None,
            mean_temperature_c: Some(row.mean_temperature_c),
            precipitation_mm: Some(row.precipitation_mm),
            relative_humidity_pct: Some(row.relative_humidity_pct),
        };
        Ok(Self {
            record: WeatherRecord::from_observation(&observation, None)?,
            tier: row.tier,
            rationale: row.rationale,
            treatment_applied: row.treatment_applied,
            treatment_suggested: row.treatment_suggested,
        })
    }
}

pub struct ExportService;

impl ExportService {
    /// Export annotated days as CSV
    pub fn export_to_csv(days: &[AnnotatedDay]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for day in days {
            wtr.serialize(ExportRow::from(day))
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }

    /// Read a previous export back into annotated days
    pub fn import_csv(data: &str) -> AppResult<Vec<AnnotatedDay>> {
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        rdr.deserialize::<ExportRow>()
            .map(|row| {
                let row =
                    row.map_err(|e| AppError::ValidationError(format!("Invalid CSV row: {}", e)))?;
                AnnotatedDay::try_from(row).map_err(|e| {
                    tracing::warn!("Rejected imported row: {}", e);
                    AppError::from(e)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{RiskAnalysis, SchedulingStrategy, TreatmentLedger};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_days() -> Vec<AnnotatedDay> {
        let date = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        let records = vec![
            WeatherRecord::new(date(1), dec("12.35"), dec("12.1"), dec("95")),
            WeatherRecord::new(date(2), dec("11"), dec("11"), dec("92")),
            WeatherRecord::new(date(3), dec("13.5"), dec("16"), dec("96.5")),
            WeatherRecord::new(date(4), dec("8.25"), dec("0"), dec("61")),
        ];
        let ledger: TreatmentLedger = [date(1)].into_iter().collect();
        RiskAnalysis::run(records, &ledger, SchedulingStrategy::Reactive).days
    }

    #[test]
    fn test_export_header_and_rows() {
        let csv = ExportService::export_to_csv(&sample_days()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some(
                "date,mean_temperature_c,precipitation_mm,relative_humidity_pct,tier,rationale,treatment_applied,treatment_suggested"
            )
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("2024-05-01,12.35,12.1,95,high,"));
        assert!(first.ends_with(",true,true"));
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn test_export_round_trip() {
        let days = sample_days();
        let csv = ExportService::export_to_csv(&days).unwrap();
        let restored = ExportService::import_csv(&csv).unwrap();
        assert_eq!(restored, days);
    }

    #[test]
    fn test_export_empty_series() {
        let csv = ExportService::export_to_csv(&[]).unwrap();
        assert!(csv.is_empty());
        assert!(ExportService::import_csv(&csv).unwrap().is_empty());
    }

    #[test]
    fn test_import_rejects_bad_tier() {
        let data = "date,mean_temperature_c,precipitation_mm,relative_humidity_pct,tier,rationale,treatment_applied,treatment_suggested\n\
                    2024-05-01,12,12,95,extreme,x,false,false\n";
        assert!(matches!(
            ExportService::import_csv(data),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_import_rejects_out_of_range_measurements() {
        let header = "date,mean_temperature_c,precipitation_mm,relative_humidity_pct,tier,rationale,treatment_applied,treatment_suggested";

        let negative_rain = format!("{}\n2024-05-01,12,-5,80,low,x,false,false\n", header);
        match ExportService::import_csv(&negative_rain) {
            Err(AppError::InvalidRecord(RecordError::OutOfRange { field, .. })) => {
                assert_eq!(field, "precipitation_mm")
            }
            other => panic!("expected out of range precipitation, got {:?}", other),
        }

        let saturated = format!("{}\n2024-05-01,12,5,150,low,x,false,false\n", header);
        match ExportService::import_csv(&saturated) {
            Err(AppError::InvalidRecord(RecordError::OutOfRange { field, .. })) => {
                assert_eq!(field, "relative_humidity_pct")
            }
            other => panic!("expected out of range humidity, got {:?}", other),
        }
    }
}
