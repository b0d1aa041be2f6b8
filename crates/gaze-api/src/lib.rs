//! Gaze Estimation API Server
//!
//! REST front-end for frame-by-frame gaze estimation: analyze uploaded
//! frames, return annotated frames, and keep per-session overlay options.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use gaze::GazeEstimator;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub mod error;
pub mod render;
mod routes;
pub mod session;
pub mod settings;

pub use error::ApiError;
pub use render::annotate;
pub use session::{OverlayOptions, SessionStore};
pub use settings::{load_landmarks, BoxedDetector, ServerSettings, Settings};

/// Application state shared across handlers
pub struct AppState {
    /// Detector and classifier
    pub estimator: GazeEstimator<BoxedDetector>,
    /// Overlay options per session
    pub sessions: SessionStore,
    /// Prometheus exporter, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Frames analyzed since start
    pub frames_analyzed: u64,
}

impl AppState {
    /// Create new application state
    pub fn new(estimator: GazeEstimator<BoxedDetector>, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            estimator,
            sessions: SessionStore::new(),
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            frames_analyzed: 0,
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub detector: String,
    pub frames_analyzed: u64,
    pub sessions: usize,
}

/// Create the application router
pub fn create_router(state: Arc<RwLock<AppState>>, max_frame_bytes: usize) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/analyze", post(routes::analyze::analyze))
        .route("/api/v1/annotate", post(routes::analyze::annotate))
        .route("/api/v1/sessions", post(routes::sessions::create_session))
        .route(
            "/api/v1/sessions/:id",
            get(routes::sessions::get_session)
                .put(routes::sessions::update_session)
                .delete(routes::sessions::delete_session),
        )
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(max_frame_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let state = state.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        detector: state.estimator.detector().name().to_string(),
        frames_analyzed: state.frames_analyzed,
        sessions: state.sessions.len(),
    })
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let state = state.read().await;
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging. `RUST_LOG` overrides the INFO default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        warn!("Tracing subscriber already set: {}", e);
    }
}

/// Run the server
pub async fn run_server(settings: Settings) -> Result<(), ApiError> {
    let detector = settings.build_detector()?;
    let estimator = GazeEstimator::new(settings.gaze.clone(), detector)?;

    let metrics = if settings.server.enable_metrics {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Metrics disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let state = Arc::new(RwLock::new(AppState::new(estimator, metrics)));
    let app = create_router(state, settings.server.max_frame_bytes);

    info!("Starting gaze API server on {}", settings.server.addr);

    let listener = tokio::net::TcpListener::bind(&settings.server.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
