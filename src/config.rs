use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "Community Health";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable names
pub const ENV_BACKEND_URL: &str = "COMMUNITY_HEALTH_BACKEND_URL";
pub const ENV_BACKEND_KEY: &str = "COMMUNITY_HEALTH_BACKEND_KEY";
pub const ENV_ANALYSIS_URL: &str = "COMMUNITY_HEALTH_ANALYSIS_URL";
pub const ENV_BIND: &str = "COMMUNITY_HEALTH_BIND";
pub const ENV_HTTP_TIMEOUT: &str = "COMMUNITY_HEALTH_HTTP_TIMEOUT_SECS";

const DEFAULT_ANALYSIS_URL: &str = "http://localhost:5000";
const DEFAULT_BIND: &str = "127.0.0.1:8787";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "community_health=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Managed backend (PostgREST-style) connection settings.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

/// External analysis service settings.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Full runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub analysis: AnalysisConfig,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Resolve configuration from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let backend_url = non_empty(ENV_BACKEND_URL).ok_or(ConfigError::Missing(ENV_BACKEND_URL))?;
        let api_key = non_empty(ENV_BACKEND_KEY).ok_or(ConfigError::Missing(ENV_BACKEND_KEY))?;
        let analysis_url =
            non_empty(ENV_ANALYSIS_URL).unwrap_or_else(|| DEFAULT_ANALYSIS_URL.to_string());

        let timeout_secs = match non_empty(ENV_HTTP_TIMEOUT) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    name: ENV_HTTP_TIMEOUT,
                    value: raw,
                })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let bind_raw = non_empty(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
            name: ENV_BIND,
            value: bind_raw.clone(),
        })?;

        Ok(Self {
            backend: BackendConfig {
                base_url: backend_url.trim_end_matches('/').to_string(),
                api_key,
                timeout_secs,
            },
            analysis: AnalysisConfig {
                base_url: analysis_url.trim_end_matches('/').to_string(),
                timeout_secs,
            },
            bind_addr,
        })
    }
}
