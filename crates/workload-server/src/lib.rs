pub mod auth;
pub mod config;
pub mod handlers;
pub mod load;
pub mod metrics;
pub mod routes;
pub mod session;
pub mod state;
pub mod utils;

pub use routes::build_router;
pub use state::AppState;
