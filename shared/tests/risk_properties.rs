//! Risk analysis property tests
//!
//! Tests for the mildew analysis core including:
//! - Property 1: Classification follows the 10-10-24 rule
//! - Property 2: Risk decay never raises a tier
//! - Property 3: Outbreak windows are well-formed
//! - Property 4: Treatment confirmation is idempotent

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

// ============================================================================
// Strategies
// ============================================================================

/// Strategy for mean temperatures (0.0 to 30.0°C)
fn temperature_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=300i64).prop_map(|n| Decimal::new(n, 1))
}

/// Strategy for daily rain (0.0 to 40.0mm)
fn rain_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=400i64).prop_map(|n| Decimal::new(n, 1))
}

/// Strategy for relative humidity (50 to 100%)
fn humidity_strategy() -> impl Strategy<Value = Decimal> {
    (500i64..=1000i64).prop_map(|n| Decimal::new(n, 1))
}

fn record_strategy() -> impl Strategy<Value = (Decimal, Decimal, Decimal)> {
    (temperature_strategy(), rain_strategy(), humidity_strategy())
}

/// Contiguous daily series of up to 30 days
fn series_strategy() -> impl Strategy<Value = Vec<WeatherRecord>> {
    prop::collection::vec(record_strategy(), 0..30).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, (temp, rain, humidity))| {
                WeatherRecord::new(base_date() + Duration::days(i as i64), temp, rain, humidity)
            })
            .collect()
    })
}

/// Treated day offsets within the series range
fn ledger_strategy() -> impl Strategy<Value = TreatmentLedger> {
    prop::collection::vec(0i64..30, 0..5).prop_map(|offsets| {
        offsets
            .into_iter()
            .map(|offset| base_date() + Duration::days(offset))
            .collect()
    })
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property 1: Tier is a pure function of the three thresholds
    #[test]
    fn prop_classification_follows_rule((temp, rain, humidity) in record_strategy()) {
        let record = WeatherRecord::new(base_date(), temp, rain, humidity);
        let tier = classify_risk(&record);

        let warm = temp >= Decimal::from(10);
        let expected = if warm && rain >= Decimal::from(10) && humidity >= Decimal::from(90) {
            RiskTier::High
        } else if warm && rain >= Decimal::from(5) {
            RiskTier::Medium
        } else {
            RiskTier::Low
        };
        prop_assert_eq!(tier, expected);
        prop_assert_eq!(classify_risk(&record), tier);
    }

    /// Property 1: More rain never lowers the tier
    #[test]
    fn prop_classification_monotonic_in_rain(
        (temp, rain, humidity) in record_strategy(),
        extra in rain_strategy()
    ) {
        let drier = WeatherRecord::new(base_date(), temp, rain, humidity);
        let wetter = WeatherRecord::new(base_date(), temp, rain + extra, humidity);
        prop_assert!(classify_risk(&wetter) >= classify_risk(&drier));
    }

    /// Property 1: The unreachable rationale is never produced by classification
    #[test]
    fn prop_rationale_matches_tier(series in series_strategy()) {
        for day in annotate_series(&series) {
            prop_assert_ne!(day.rationale.as_str(), RATIONALE_NOT_OPTIMAL);
            prop_assert_eq!(day.rationale.as_str(), risk_rationale(day.tier, &day.record));
        }
    }

    /// Property 2: Decay only downgrades, and only inside protection periods
    #[test]
    fn prop_decay_never_upgrades(series in series_strategy(), ledger in ledger_strategy()) {
        let classified = annotate_series(&series);
        let mut decayed = classified.clone();
        apply_risk_decay(&mut decayed, &ledger);

        for (before, after) in classified.iter().zip(decayed.iter()) {
            prop_assert!(after.tier <= before.tier);

            let protected = ledger.dates().iter().any(|&treated| {
                before.date() > treated && before.date() <= treated + Duration::days(7)
            });
            if !protected {
                prop_assert_eq!(after.tier, before.tier);
            }
        }
    }

    /// Property 3: Sustained windows start and end on high-risk days, three or more apart
    #[test]
    fn prop_sustained_windows_well_formed(series in series_strategy()) {
        let days = annotate_series(&series);
        for window in sustained_high_risk_windows(&days) {
            prop_assert_eq!(window.cause, OutbreakCause::SustainedHighRisk);
            prop_assert!((window.end_date - window.start_date).num_days() >= 2);
            for date in [window.start_date, window.end_date] {
                prop_assert!(days.iter().any(|d| d.date() == date && d.tier == RiskTier::High));
            }
        }
    }

    /// Property 3: One rain window per qualifying 7-record span
    #[test]
    fn prop_rain_windows_span_seven_records(series in series_strategy()) {
        let days = annotate_series(&series);
        let windows = double_heavy_rain_windows(&days);
        prop_assert!(windows.len() <= days.len().saturating_sub(6));
        for window in windows {
            prop_assert_eq!((window.end_date - window.start_date).num_days(), 6);
        }
    }

    /// Property 4: Confirming the same date twice changes nothing
    #[test]
    fn prop_confirm_idempotent(series in series_strategy(), offset in 0i64..30) {
        let date = base_date() + Duration::days(offset);
        let mut once = TreatmentLedger::new();
        once.confirm_treatment(date);
        let mut twice = once.clone();
        prop_assert!(!twice.confirm_treatment(date));
        prop_assert_eq!(&once, &twice);

        let a = RiskAnalysis::run(series.clone(), &once, SchedulingStrategy::Reactive);
        let b = RiskAnalysis::run(series, &twice, SchedulingStrategy::Reactive);
        prop_assert_eq!(a, b);
    }

    /// Recommendations are ordered and never fall on the same day
    #[test]
    fn prop_recommendations_strictly_increasing(series in series_strategy()) {
        let days = annotate_series(&series);
        for strategy in [SchedulingStrategy::Reactive, SchedulingStrategy::Preventive] {
            let recommendations = recommend_treatments(&days, strategy);
            for pair in recommendations.windows(2) {
                prop_assert!(pair[1].date > pair[0].date);
            }
            if let Some(first) = recommendations.first() {
                prop_assert_ne!(first.reason, TreatmentReason::IntenseRainAfterTreatment);
            }
        }
    }
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[cfg(test)]
mod scenario_tests {
    use super::*;

    fn day(offset: i64) -> NaiveDate {
        base_date() + Duration::days(offset)
    }

    fn high(offset: i64) -> WeatherRecord {
        WeatherRecord::new(day(offset), Decimal::from(14), Decimal::from(12), Decimal::from(93))
    }

    fn dry(offset: i64) -> WeatherRecord {
        WeatherRecord::new(day(offset), Decimal::from(14), Decimal::ZERO, Decimal::from(70))
    }

    /// Confirming a suggested treatment and re-analysing
    #[test]
    fn test_confirm_then_reanalyse() {
        let series: Vec<WeatherRecord> = (0..10)
            .map(|i| if (2..=5).contains(&i) { high(i) } else { dry(i) })
            .collect();
        let mut ledger = TreatmentLedger::new();

        let first = RiskAnalysis::run(series.clone(), &ledger, SchedulingStrategy::Reactive);
        assert_eq!(first.recommendations.len(), 1);
        let suggested = first.recommendations[0].date;
        assert_eq!(suggested, day(2));

        assert!(ledger.confirm_treatment(suggested));
        let second = RiskAnalysis::run(series, &ledger, SchedulingStrategy::Reactive);

        // Outbreak view is unchanged by mitigation
        assert_eq!(first.outbreaks, second.outbreaks);
        assert_eq!(second.days[2].tier, RiskTier::High);
        assert!(second.days[2].treatment_applied);
        assert!(second.days[2].treatment_suggested);
        for d in &second.days[3..=5] {
            assert_eq!(d.tier, RiskTier::Medium);
        }
    }

    /// A gap of two calendar days breaks a high-risk run
    #[test]
    fn test_gap_breaks_run() {
        let series = vec![high(0), high(1), dry(2), high(3), dry(4)];
        let days = annotate_series(&series);
        assert!(sustained_high_risk_windows(&days).is_empty());
    }
}
