use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
};
use tracing::debug;

use crate::metrics;
use crate::state::AppState;
use crate::utils::error::ApiError;

/// /metrics, any method
///
/// Scraping sweeps the session store: expired sessions are evicted and the
/// remaining live ones are reported.
pub async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let active = state.sessions.sweep_and_count();
    debug!("Metrics scrape: {} active sessions", active);

    let body = metrics::render_active_sessions(active)
        .map_err(|e| ApiError::InternalError(format!("metrics encoding failed: {}", e)))?;

    Ok((StatusCode::OK, [(CONTENT_TYPE, metrics::CONTENT_TYPE)], body))
}
