//! Outbreak window detection
//!
//! Two independent signatures are scanned; their results are concatenated
//! without deduplication.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::risk::{AnnotatedDay, RiskTier};

/// Minimum number of chained high-risk days forming an outbreak
pub const SUSTAINED_RUN_MIN_DAYS: usize = 3;

/// Size of the sliding window for the heavy rain scan
pub const HEAVY_RAIN_WINDOW_DAYS: usize = 7;

/// Heavy rain days needed inside one sliding window
pub const HEAVY_RAIN_MIN_COUNT: usize = 2;

/// Why a date range was flagged
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OutbreakCause {
    SustainedHighRisk,
    DoubleHeavyRain,
}

impl std::fmt::Display for OutbreakCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutbreakCause::SustainedHighRisk => write!(f, "Sustained high risk"),
            OutbreakCause::DoubleHeavyRain => write!(f, "Double heavy rain"),
        }
    }
}

/// A date range that plausibly represents an active infection event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutbreakWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cause: OutbreakCause,
}

impl OutbreakWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, cause: OutbreakCause) -> Self {
        Self {
            start_date,
            end_date,
            cause,
        }
    }
}

/// Run both scans, sustained high risk first
pub fn detect_outbreaks(days: &[AnnotatedDay]) -> Vec<OutbreakWindow> {
    let mut windows = sustained_high_risk_windows(days);
    windows.extend(double_heavy_rain_windows(days));
    windows
}

/// Chains of high-risk dates at most one calendar day apart.
///
/// Duplicated dates chain as well. Runs shorter than
/// `SUSTAINED_RUN_MIN_DAYS` are dropped.
pub fn sustained_high_risk_windows(days: &[AnnotatedDay]) -> Vec<OutbreakWindow> {
    let mut high_dates: Vec<NaiveDate> = days
        .iter()
        .filter(|day| day.tier == RiskTier::High)
        .map(AnnotatedDay::date)
        .collect();
    high_dates.sort();

    let mut windows = Vec::new();
    let mut run: Vec<NaiveDate> = Vec::new();

    for date in high_dates {
        if let Some(&previous) = run.last() {
            if (date - previous).num_days() > 1 {
                close_run(&run, &mut windows);
                run.clear();
            }
        }
        run.push(date);
    }
    close_run(&run, &mut windows);

    windows
}

fn close_run(run: &[NaiveDate], windows: &mut Vec<OutbreakWindow>) {
    if run.len() < SUSTAINED_RUN_MIN_DAYS {
        return;
    }
    if let (Some(&first), Some(&last)) = (run.first(), run.last()) {
        windows.push(OutbreakWindow::new(
            first,
            last,
            OutbreakCause::SustainedHighRisk,
        ));
    }
}

/// Every 7-record span containing at least two days of 10 mm or more.
///
/// Overlapping spans qualify independently and are all reported.
pub fn double_heavy_rain_windows(days: &[AnnotatedDay]) -> Vec<OutbreakWindow> {
    let heavy = Decimal::from(10);

    days.windows(HEAVY_RAIN_WINDOW_DAYS)
        .filter(|span| {
            span.iter()
                .filter(|day| day.record.precipitation_mm >= heavy)
                .count()
                >= HEAVY_RAIN_MIN_COUNT
        })
        .filter_map(|span| {
            let first = span.first()?;
            let last = span.last()?;
            Some(OutbreakWindow::new(
                first.date(),
                last.date(),
                OutbreakCause::DoubleHeavyRain,
            ))
        })
        .collect()
}
