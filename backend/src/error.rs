//! Error handling for the Mildew Risk Platform
//!
//! Provides consistent error responses in English and Spanish

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::RecordError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_es: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid weather record: {0}")]
    InvalidRecord(#[from] RecordError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // External service errors
    #[error("Weather service unavailable")]
    WeatherServiceUnavailable,

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|field| field.to_string())
            .unwrap_or_default();
        AppError::Validation {
            message: format!("Invalid value for {}", field),
            message_es: format!("Valor no válido para {}", field),
            field,
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation {
                field,
                message,
                message_es,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_es: message_es.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_es: format!("Datos no válidos: {}", msg),
                    field: None,
                },
            ),
            AppError::InvalidRecord(err) => {
                let (code, message_es) = match err {
                    RecordError::MissingField { date, field } => (
                        "MISSING_FIELD",
                        format!("{}: falta el campo obligatorio `{}`", date, field),
                    ),
                    RecordError::OutOfRange { date, field, .. } => (
                        "OUT_OF_RANGE",
                        format!("{}: el campo `{}` está fuera de rango", date, field),
                    ),
                };
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorDetail {
                        code: code.to_string(),
                        message_en: err.to_string(),
                        message_es,
                        field: Some(err.field().to_string()),
                    },
                )
            }
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_es: format!("No se encontró {}", resource),
                    field: None,
                },
            ),
            AppError::WeatherServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "WEATHER_SERVICE_UNAVAILABLE".to_string(),
                    message_en: "Could not fetch weather data".to_string(),
                    message_es: "No se pudieron obtener los datos meteorológicos".to_string(),
                    field: None,
                },
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "EXTERNAL_SERVICE_ERROR".to_string(),
                    message_en: format!("External service error: {}", msg),
                    message_es: format!("Error del servicio externo: {}", msg),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_es: format!("Error de configuración: {}", msg),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_es: "Error interno del servidor".to_string(),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
