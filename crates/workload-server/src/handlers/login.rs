use axum::{body::Bytes, extract::State, http::Method, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::AppState;
use crate::utils::error::ApiError;

/// Credentials are accepted as-is; only `username` is checked. Capitalized
/// keys are accepted too.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "Username")]
    pub username: String,
    #[serde(default, alias = "Password")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /login
pub async fn login_handler(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError> {
    if method != Method::POST {
        return Err(ApiError::invalid_method());
    }

    state.load.simulate();

    let creds: LoginRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::invalid_body())?;

    if creds.username.is_empty() {
        return Err(ApiError::BadRequest("Username is required".to_string()));
    }

    let token = state.sessions.create(&creds.username);
    info!("User '{}' logged in. Session token: {}", creds.username, token);

    Ok(Json(LoginResponse { token }))
}
