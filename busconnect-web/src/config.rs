//! Server configuration, read once from the environment at startup.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, info};

use crate::api::{BusApiConfig, DEFAULT_BASE_URL};

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the whole server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the BusConnect backend.
    pub api_url: String,

    /// Address the HTTP server binds to.
    pub listen: SocketAddr,

    /// Backend request timeout (seconds).
    pub timeout_secs: u64,

    /// Maximum concurrent backend requests.
    pub max_concurrent: usize,

    /// Directory served under `/static`.
    pub static_dir: PathBuf,

    /// Serve from fixture files in this directory instead of the backend.
    pub mock_dir: Option<PathBuf>,

    /// How often the stop directory is refreshed.
    pub stop_refresh: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            timeout_secs: 30,
            max_concurrent: 5,
            static_dir: PathBuf::from("static"),
            mock_dir: None,
            stop_refresh: Duration::from_secs(60 * 60),
        }
    }
}

impl AppConfig {
    /// Read `BUSCONNECT_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or blank keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            api_url: get("BUSCONNECT_API_URL").unwrap_or(defaults.api_url),
            listen: parse_or(&get, "BUSCONNECT_LISTEN", defaults.listen)?,
            timeout_secs: parse_or(&get, "BUSCONNECT_TIMEOUT_SECS", defaults.timeout_secs)?,
            max_concurrent: parse_or(&get, "BUSCONNECT_MAX_CONCURRENT", defaults.max_concurrent)?,
            static_dir: get("BUSCONNECT_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            mock_dir: get("BUSCONNECT_MOCK_DIR").map(PathBuf::from),
            stop_refresh: match parse_or(&get, "BUSCONNECT_STOP_REFRESH_SECS", 0u64)? {
                0 => defaults.stop_refresh,
                secs => Duration::from_secs(secs),
            },
        };

        info!(
            api_url = %config.api_url,
            listen = %config.listen,
            mock = config.mock_dir.is_some(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Backend client settings derived from this configuration.
    pub fn api_config(&self) -> BusApiConfig {
        BusApiConfig::new(&self.api_url)
            .with_max_concurrent(self.max_concurrent)
            .with_timeout(self.timeout_secs)
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        },
        None => {
            debug!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
