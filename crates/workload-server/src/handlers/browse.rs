use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;
use crate::utils::error::ApiError;

pub const PRODUCTS: [&str; 3] = ["Product A", "Product B", "Product C"];

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub status: &'static str,
    pub data: [&'static str; 3],
}

/// /browse, any method
pub async fn browse_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BrowseResponse>, ApiError> {
    if !state.auth.authenticate(&headers, &state.sessions) {
        return Err(ApiError::unauthorized());
    }

    state.load.simulate();

    debug!("Browse endpoint accessed.");
    Ok(Json(BrowseResponse {
        status: "success",
        data: PRODUCTS,
    }))
}
