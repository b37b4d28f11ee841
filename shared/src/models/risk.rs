//! Downy mildew risk classification models
//!
//! Primary infection follows the 10-10-24 rule: mean temperature of at
//! least 10 °C, at least 10 mm of rain and relative humidity of at least 90%.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::weather::WeatherRecord;

pub const RATIONALE_CRITICAL: &str =
    "critical outbreak conditions: intense rain and extreme humidity";
pub const RATIONALE_PRIMARY_INFECTION: &str = "key primary-infection criteria met.";
pub const RATIONALE_FAVORABLE: &str =
    "favorable humidity/temperature, rain below high threshold";
pub const RATIONALE_NOT_OPTIMAL: &str = "adequate temperature, conditions not yet optimal.";
pub const RATIONALE_LOW: &str = "dry or cold conditions: very low infection risk.";

/// Infection risk tier, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl RiskTier {
    /// Numeric value used for trend computation (0, 1, 2)
    pub fn value(self) -> i32 {
        self as i32
    }

    /// One step down; `Low` stays `Low`
    pub fn step_down(self) -> Self {
        match self {
            RiskTier::High => RiskTier::Medium,
            RiskTier::Medium => RiskTier::Low,
            RiskTier::Low => RiskTier::Low,
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "Low risk"),
            RiskTier::Medium => write!(f, "Medium risk"),
            RiskTier::High => write!(f, "High risk"),
        }
    }
}

/// Classify one day (first matching rule wins)
pub fn classify_risk(record: &WeatherRecord) -> RiskTier {
    let warm = record.mean_temperature_c >= Decimal::from(10);

    if warm
        && record.precipitation_mm >= Decimal::from(10)
        && record.relative_humidity_pct >= Decimal::from(90)
    {
        RiskTier::High
    } else if warm && record.precipitation_mm >= Decimal::from(5) {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Human-readable explanation for a tier given the day's measurements.
///
/// The wording only refines the tier. The second `Medium` branch cannot be
/// reached through `classify_risk`, since `Medium` already implies 5 mm.
pub fn risk_rationale(tier: RiskTier, record: &WeatherRecord) -> &'static str {
    match tier {
        RiskTier::High => {
            if record.precipitation_mm >= Decimal::from(15)
                && record.relative_humidity_pct >= Decimal::from(95)
            {
                RATIONALE_CRITICAL
            } else {
                RATIONALE_PRIMARY_INFECTION
            }
        }
        RiskTier::Medium => {
            if record.precipitation_mm >= Decimal::from(5) {
                RATIONALE_FAVORABLE
            } else {
                RATIONALE_NOT_OPTIMAL
            }
        }
        RiskTier::Low => RATIONALE_LOW,
    }
}

/// A weather record with its classification and treatment annotations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotatedDay {
    pub record: WeatherRecord,
    pub tier: RiskTier,
    pub rationale: String,
    pub treatment_applied: bool,
    pub treatment_suggested: bool,
}

impl AnnotatedDay {
    pub fn classify(record: WeatherRecord) -> Self {
        let tier = classify_risk(&record);
        let rationale = risk_rationale(tier, &record).to_string();
        Self {
            record,
            tier,
            rationale,
            treatment_applied: false,
            treatment_suggested: false,
        }
    }

    pub fn date(&self) -> chrono::NaiveDate {
        self.record.date
    }

    /// Re-derive the rationale from the current (possibly decayed) tier
    pub fn refresh_rationale(&mut self) {
        self.rationale = risk_rationale(self.tier, &self.record).to_string();
    }
}

/// Classify each record independently, preserving order
pub fn annotate_series(records: &[WeatherRecord]) -> Vec<AnnotatedDay> {
    records.iter().cloned().map(AnnotatedDay::classify).collect()
}

/// Direction of risk between the first and last day of a series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl RiskTrend {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTrend::Increasing => "risk increasing",
            RiskTrend::Decreasing => "risk decreasing",
            RiskTrend::Stable => "risk stable",
        }
    }
}

impl std::fmt::Display for RiskTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Trend over the series; `None` for fewer than three days
pub fn risk_trend(days: &[AnnotatedDay]) -> Option<RiskTrend> {
    if days.len() < 3 {
        return None;
    }
    let first = days.first()?.tier.value();
    let last = days.last()?.tier.value();
    Some(match (last - first).signum() {
        1 => RiskTrend::Increasing,
        -1 => RiskTrend::Decreasing,
        _ => RiskTrend::Stable,
    })
}

/// Number of days per tier over an analysed period
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskSummary {
    pub total_days: usize,
    pub high_days: usize,
    pub medium_days: usize,
    pub low_days: usize,
}

impl RiskSummary {
    pub fn from_days(days: &[AnnotatedDay]) -> Self {
        days.iter().fold(
            Self {
                total_days: days.len(),
                ..Self::default()
            },
            |mut summary, day| {
                match day.tier {
                    RiskTier::High => summary.high_days += 1,
                    RiskTier::Medium => summary.medium_days += 1,
                    RiskTier::Low => summary.low_days += 1,
                }
                summary
            },
        )
    }
}

impl std::fmt::Display for RiskSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = [
            (self.high_days, "high"),
            (self.medium_days, "medium"),
            (self.low_days, "low"),
        ]
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, tier)| format!("{} days with {} risk", count, tier))
        .collect();
        write!(f, "In the last {} days: {}.", self.total_days, parts.join(", "))
    }
}
