//! WebAssembly module for the Mildew Risk Platform
//!
//! Provides client-side computation for:
//! - Single-day risk classification
//! - Full series analysis against locally confirmed treatments
//! - Offline observation validation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::analysis::*;
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("mildew risk module loaded"));
}

fn to_decimal(name: &str, value: f64) -> Result<Decimal, String> {
    Decimal::try_from(value).map_err(|_| format!("Invalid {}: {}", name, value))
}

fn parse_record(
    mean_temperature_c: f64,
    precipitation_mm: f64,
    relative_humidity_pct: f64,
) -> Result<WeatherRecord, String> {
    Ok(WeatherRecord::new(
        NaiveDate::default(),
        to_decimal("temperature", mean_temperature_c)?,
        to_decimal("precipitation", precipitation_mm)?,
        to_decimal("humidity", relative_humidity_pct)?,
    ))
}

/// Classify one day; returns `low`, `medium` or `high`
#[wasm_bindgen]
pub fn classify_day(
    mean_temperature_c: f64,
    precipitation_mm: f64,
    relative_humidity_pct: f64,
) -> Result<String, JsValue> {
    let record = parse_record(mean_temperature_c, precipitation_mm, relative_humidity_pct)
        .map_err(|e| JsValue::from_str(&e))?;
    Ok(tier_code(classify_risk(&record)).to_string())
}

/// Explanation shown next to a classified day
#[wasm_bindgen]
pub fn explain_day(
    mean_temperature_c: f64,
    precipitation_mm: f64,
    relative_humidity_pct: f64,
) -> Result<String, JsValue> {
    let record = parse_record(mean_temperature_c, precipitation_mm, relative_humidity_pct)
        .map_err(|e| JsValue::from_str(&e))?;
    Ok(risk_rationale(classify_risk(&record), &record).to_string())
}

/// Check an observation before upload; returns an empty string when valid
#[wasm_bindgen]
pub fn validate_observation_json(observation_json: &str) -> String {
    match serde_json::from_str::<DailyObservation>(observation_json) {
        Ok(observation) => match WeatherRecord::from_observation(&observation, None) {
            Ok(_) => String::new(),
            Err(e) => e.to_string(),
        },
        Err(e) => format!("Invalid observation JSON: {}", e),
    }
}

/// Analyse a series of observations against a list of treated dates
///
/// `strategy` is `reactive` or `preventive`. Returns the analysis as JSON.
#[wasm_bindgen]
pub fn analyze_series_json(
    observations_json: &str,
    treated_dates_json: &str,
    strategy: &str,
) -> Result<String, JsValue> {
    analyze_series(observations_json, treated_dates_json, strategy)
        .map_err(|e| JsValue::from_str(&e))
}

fn analyze_series(
    observations_json: &str,
    treated_dates_json: &str,
    strategy: &str,
) -> Result<String, String> {
    let observations: Vec<DailyObservation> = serde_json::from_str(observations_json)
        .map_err(|e| format!("Invalid observations JSON: {}", e))?;
    let treated: Vec<NaiveDate> = serde_json::from_str(treated_dates_json)
        .map_err(|e| format!("Invalid treatment dates JSON: {}", e))?;
    let strategy: SchedulingStrategy =
        serde_json::from_value(serde_json::Value::String(strategy.to_string()))
            .map_err(|_| format!("Unknown scheduling strategy: {}", strategy))?;

    let records = records_from_observations(&observations, None).map_err(|e| e.to_string())?;
    let ledger: TreatmentLedger = treated.into_iter().collect();
    let analysis = RiskAnalysis::run(records, &ledger, strategy);

    serde_json::to_string(&analysis).map_err(|e| format!("Serialization error: {}", e))
}

fn tier_code(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => "low",
        RiskTier::Medium => "medium",
        RiskTier::High => "high",
    }
}
