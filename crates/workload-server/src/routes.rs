use axum::{routing::any, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::state::AppState;

/// Exact-path dispatch. Method checks live in the handlers so that each
/// endpoint controls whether auth or method is checked first.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/login", any(handlers::login::login_handler))
        .route("/browse", any(handlers::browse::browse_handler))
        .route("/submit", any(handlers::submit::submit_handler))
        .route("/metrics", any(handlers::metrics::metrics_handler))
        .fallback(handlers::not_found_handler)
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
