use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::state::AppState;
use crate::utils::error::ApiError;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// POST /submit
///
/// Auth is checked before the method, and both before the body is parsed.
/// A JSON `null` body is accepted as an empty submission.
pub async fn submit_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    if !state.auth.authenticate(&headers, &state.sessions) {
        return Err(ApiError::unauthorized());
    }

    if method != Method::POST {
        return Err(ApiError::invalid_method());
    }

    state.load.simulate();

    let data: Option<Map<String, Value>> =
        serde_json::from_slice(&body).map_err(|_| ApiError::invalid_body())?;
    let data = Value::Object(data.unwrap_or_default());

    info!("Submit endpoint accessed with data: {}", data);

    Ok(Json(SubmitResponse {
        status: "success",
        message: "Data submitted successfully",
    }))
}
