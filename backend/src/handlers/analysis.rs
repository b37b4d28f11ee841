//! HTTP handlers for risk analysis

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{DailyObservation, GpsCoordinates, RiskAnalysis};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::AppResult;
use crate::services::{AnalysisService, ExportService, LocationRequest};
use crate::AppState;

/// Output format query
#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    /// `json` (default) or `csv`
    pub format: Option<String>,
}

/// Input for analysing caller-supplied observations
#[derive(Debug, Deserialize)]
pub struct AnalyzeObservationsInput {
    pub observations: Vec<DailyObservation>,
}

/// Query for analysing the weather at a location
#[derive(Debug, Deserialize, Validate)]
pub struct LocationAnalysisQuery {
    #[validate(custom = "validate_latitude_field")]
    pub latitude: Decimal,
    #[validate(custom = "validate_longitude_field")]
    pub longitude: Decimal,
    #[validate(range(min = 1))]
    pub days_back: Option<u32>,
    #[serde(default)]
    pub include_forecast: bool,
    pub format: Option<String>,
}

fn validate_latitude_field(latitude: &Decimal) -> Result<(), ValidationError> {
    shared::validate_latitude(*latitude).map_err(ValidationError::new)
}

fn validate_longitude_field(longitude: &Decimal) -> Result<(), ValidationError> {
    shared::validate_longitude(*longitude).map_err(ValidationError::new)
}

/// Analysis plus its human-readable summary lines
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub analysis: RiskAnalysis,
    pub trend_label: Option<&'static str>,
    pub summary_text: String,
}

impl From<RiskAnalysis> for AnalysisResponse {
    fn from(analysis: RiskAnalysis) -> Self {
        Self {
            trend_label: analysis.trend_label(),
            summary_text: analysis.summary.to_string(),
            analysis,
        }
    }
}

/// Analyse observations uploaded by the caller
pub async fn analyze_observations(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<FormatQuery>,
    Json(input): Json<AnalyzeObservationsInput>,
) -> AppResult<Response> {
    let ledger = state.sessions.ledger(session_id).await?;
    let service = AnalysisService::new(state.config.as_ref().clone());
    let analysis = service.analyze_observations(&input.observations, &ledger)?;
    analysis_response(analysis, query.format.as_deref())
}

/// Re-analyse a previous CSV export against the current session ledger
pub async fn reanalyze_export(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<FormatQuery>,
    body: String,
) -> AppResult<Response> {
    let ledger = state.sessions.ledger(session_id).await?;
    let records = ExportService::import_csv(&body)?
        .into_iter()
        .map(|day| day.record)
        .collect();
    let service = AnalysisService::new(state.config.as_ref().clone());
    analysis_response(service.analyze_records(records, &ledger), query.format.as_deref())
}

/// Fetch the weather for a location and analyse it
pub async fn analyze_location(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<LocationAnalysisQuery>,
) -> AppResult<Response> {
    query.validate()?;

    let ledger = state.sessions.ledger(session_id).await?;
    let service =
        AnalysisService::with_client(state.config.as_ref().clone(), state.weather_client.clone());
    let request = LocationRequest {
        location: GpsCoordinates::new(query.latitude, query.longitude),
        days_back: query.days_back,
        include_forecast: query.include_forecast,
    };

    let today = Utc::now().date_naive();
    let analysis = service.analyze_location(&request, &ledger, today).await?;
    analysis_response(analysis, query.format.as_deref())
}

fn analysis_response(analysis: RiskAnalysis, format: Option<&str>) -> AppResult<Response> {
    if format == Some("csv") {
        let csv = ExportService::export_to_csv(&analysis.days)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"mildew_risk.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(AnalysisResponse::from(analysis)).into_response())
    }
}
