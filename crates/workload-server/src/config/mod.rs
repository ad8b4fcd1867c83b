pub mod settings;

pub use settings::{AuthConfig, LoadConfig, ServerConfig, SessionConfig, Settings};
