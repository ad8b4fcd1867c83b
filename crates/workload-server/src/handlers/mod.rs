pub mod browse;
pub mod login;
pub mod metrics;
pub mod submit;

use crate::utils::error::ApiError;

/// Fallback for every path outside the router.
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Unsupported path".to_string())
}
