//! Treatment scheduling, the session treatment ledger and risk decay

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::risk::{AnnotatedDay, RiskTier};

/// Days between two treatments triggered by infection pressure
pub const HIGH_RISK_COOLDOWN_DAYS: i64 = 10;

/// Days after a treatment before intense rain may trigger another
pub const RAIN_COOLDOWN_DAYS: i64 = 1;

/// Days after a confirmed treatment whose risk is reduced
pub const TREATMENT_PROTECTION_DAYS: i64 = 7;

/// Why a treatment date was proposed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentReason {
    HighInfectionPressure,
    IntenseRainAfterTreatment,
    Preventive,
}

impl std::fmt::Display for TreatmentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreatmentReason::HighInfectionPressure => write!(f, "High infection pressure"),
            TreatmentReason::IntenseRainAfterTreatment => {
                write!(f, "Intense rain after treatment")
            }
            TreatmentReason::Preventive => {
                write!(f, "Prevention ahead of an outbreak or intense rain")
            }
        }
    }
}

/// A proposed treatment date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreatmentRecommendation {
    pub date: NaiveDate,
    pub reason: TreatmentReason,
}

impl TreatmentRecommendation {
    pub fn new(date: NaiveDate, reason: TreatmentReason) -> Self {
        Self { date, reason }
    }
}

/// Which recommendation walk to run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingStrategy {
    /// Treat on high-risk days, re-treat after intense rain
    #[default]
    Reactive,
    /// Treat the day before a high-risk or heavy rain day
    Preventive,
}

/// Walk the series and propose treatment dates
pub fn recommend_treatments(
    days: &[AnnotatedDay],
    strategy: SchedulingStrategy,
) -> Vec<TreatmentRecommendation> {
    match strategy {
        SchedulingStrategy::Reactive => reactive_recommendations(days),
        SchedulingStrategy::Preventive => preventive_recommendations(days),
    }
}

/// Single pass with one cooldown clock shared by both triggers.
///
/// A high-risk day needs no prior treatment or 10 days since the last one.
/// Otherwise 20 mm of rain re-triggers once at least a day has passed since
/// a previous treatment; it never triggers the first treatment.
pub fn reactive_recommendations(days: &[AnnotatedDay]) -> Vec<TreatmentRecommendation> {
    let intense_rain = Decimal::from(20);
    let mut recommendations = Vec::new();
    let mut last_treatment: Option<NaiveDate> = None;

    for day in days {
        let date = day.date();
        let since_last = last_treatment.map(|last| (date - last).num_days());

        let reason = if day.tier == RiskTier::High
            && since_last.map_or(true, |elapsed| elapsed >= HIGH_RISK_COOLDOWN_DAYS)
        {
            Some(TreatmentReason::HighInfectionPressure)
        } else if day.record.precipitation_mm >= intense_rain
            && since_last.map_or(false, |elapsed| elapsed >= RAIN_COOLDOWN_DAYS)
        {
            Some(TreatmentReason::IntenseRainAfterTreatment)
        } else {
            None
        };

        if let Some(reason) = reason {
            recommendations.push(TreatmentRecommendation::new(date, reason));
            last_treatment = Some(date);
        }
    }

    recommendations
}

/// Propose the day before each high-risk or heavy rain day.
///
/// The cooldown is measured from the last proposed date to the candidate.
pub fn preventive_recommendations(days: &[AnnotatedDay]) -> Vec<TreatmentRecommendation> {
    let heavy_rain = Decimal::from(10);
    let mut recommendations = Vec::new();
    let mut last_treatment: Option<NaiveDate> = None;

    for pair in days.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        if current.tier != RiskTier::High && current.record.precipitation_mm < heavy_rain {
            continue;
        }

        let candidate = previous.date();
        let cooled_down = last_treatment
            .map_or(true, |last| (candidate - last).num_days() >= HIGH_RISK_COOLDOWN_DAYS);
        if cooled_down {
            recommendations.push(TreatmentRecommendation::new(
                candidate,
                TreatmentReason::Preventive,
            ));
            last_treatment = Some(candidate);
        }
    }

    recommendations
}

/// Dates the user has confirmed as treated during one session.
///
/// Append-only; confirmation order is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreatmentLedger {
    confirmed: Vec<NaiveDate>,
}

impl TreatmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a treated date. Returns `false` when it was already recorded.
    pub fn confirm_treatment(&mut self, date: NaiveDate) -> bool {
        if self.contains(date) {
            return false;
        }
        self.confirmed.push(date);
        true
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.confirmed.contains(&date)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.confirmed
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }
}

impl FromIterator<NaiveDate> for TreatmentLedger {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for date in iter {
            ledger.confirm_treatment(date);
        }
        ledger
    }
}

/// Lower the tier of the 7 days following each confirmed treatment.
///
/// Each ledger entry steps every day in `(date, date + 7]` down once, so
/// overlapping protection periods compound. Rationales are refreshed
/// afterwards to match the new tiers.
pub fn apply_risk_decay(days: &mut [AnnotatedDay], ledger: &TreatmentLedger) {
    for &treated in ledger.dates() {
        let protected_until = treated
            .checked_add_signed(Duration::days(TREATMENT_PROTECTION_DAYS))
            .unwrap_or(NaiveDate::MAX);
        for day in days
            .iter_mut()
            .filter(|day| day.date() > treated && day.date() <= protected_until)
        {
            day.tier = day.tier.step_down();
        }
    }

    for day in days.iter_mut() {
        day.refresh_rationale();
    }
}

/// Mark applied and suggested treatments on each day
pub fn mark_treatments(
    days: &mut [AnnotatedDay],
    ledger: &TreatmentLedger,
    recommendations: &[TreatmentRecommendation],
) {
    let suggested: HashSet<NaiveDate> = recommendations.iter().map(|r| r.date).collect();
    for day in days.iter_mut() {
        day.treatment_applied = ledger.contains(day.date());
        day.treatment_suggested = suggested.contains(&day.date());
    }
}
