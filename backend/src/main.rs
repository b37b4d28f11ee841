//! Mildew Risk Platform - Backend Server
//!
//! Downy mildew risk analysis for vineyards: daily risk classification,
//! outbreak detection and fungicide treatment scheduling over recent and
//! forecast weather.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::WeatherClient;
use services::SessionService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionService,
    pub weather_client: WeatherClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let weather_client = WeatherClient::new(&config.weather);
        Self {
            config: Arc::new(config),
            sessions: SessionService::new(),
            weather_client,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mildew_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Mildew Risk Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "Weather source: {} ({})",
        config.weather.api_endpoint,
        config.weather.timezone
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_app(AppState::new(config));

    // Start server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Mildew Risk Platform API v1.0"
}
