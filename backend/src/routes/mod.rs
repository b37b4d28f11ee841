//! Route definitions for the Mildew Risk Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/sessions", session_routes())
}

/// Session routes: ledger management and analysis runs
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_session))
        .route(
            "/:id",
            get(handlers::get_session).delete(handlers::end_session),
        )
        .route("/:id/treatments", post(handlers::confirm_treatment))
        .route("/:id/analysis", post(handlers::analyze_observations))
        .route("/:id/analysis/import", post(handlers::reanalyze_export))
        .route("/:id/analysis/location", get(handlers::analyze_location))
}
