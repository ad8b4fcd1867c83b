use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::warn;

/// Legacy variables read by load-test harnesses; kept outside the `APP__` namespace.
pub const LOAD_CPU_ITERATIONS_ENV: &str = "LOAD_CPU_ITERATIONS";
pub const LOAD_MEM_MB_ENV: &str = "LOAD_MEM_MB";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    /// Only ever read from `LOAD_*`, never from the config sources.
    #[serde(skip)]
    pub load: LoadConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Per-request synthetic load. Immutable once the server starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadConfig {
    pub cpu_iterations: u64,
    pub memory_mb: u64,
}

impl LoadConfig {
    /// `LOAD_CPU_ITERATIONS` / `LOAD_MEM_MB`. Missing or unparsable values
    /// fall back to 0.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var(LOAD_CPU_ITERATIONS_ENV).ok().as_deref(),
            env::var(LOAD_MEM_MB_ENV).ok().as_deref(),
        )
    }

    pub fn from_vars(cpu_iterations: Option<&str>, memory_mb: Option<&str>) -> Self {
        Self {
            cpu_iterations: cpu_iterations
                .map(|v| lenient_u64(LOAD_CPU_ITERATIONS_ENV, v))
                .unwrap_or(0),
            memory_mb: memory_mb
                .map(|v| lenient_u64(LOAD_MEM_MB_ENV, v))
                .unwrap_or(0),
        }
    }

    pub fn arena_bytes(&self) -> usize {
        (self.memory_mb as usize).saturating_mul(1024 * 1024)
    }
}

/// Session lifetime is fixed (see `session::SESSION_TTL`); only the janitor
/// is configurable.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SessionConfig {
    /// 0 disables the background janitor; `/metrics` still sweeps.
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    /// Reject `Authorization` values lacking the `Bearer ` prefix instead of
    /// treating the raw value as the token.
    pub require_bearer_prefix: bool,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config, LoadConfig::from_env())
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let defaults = ServerConfig::default();
        Ok(Config::builder()
            .set_default("server.host", defaults.host)?
            .set_default("server.port", i64::from(defaults.port))?
            .set_default("session.sweep_interval_secs", 0_i64)?
            .set_default("auth.require_bearer_prefix", false)?)
    }

    fn from_config(config: Config, load: LoadConfig) -> Result<Self> {
        let mut settings: Settings = config.try_deserialize()?;
        settings.load = load;
        Ok(settings)
    }
}

fn lenient_u64(name: &str, raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(v) => v,
        Err(_) => {
            warn!("{}={:?} is not a non-negative integer, using 0", name, raw);
            0
        }
    }
}
