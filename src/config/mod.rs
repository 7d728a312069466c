//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `QUIZDOC_*` environment variables;
//! the completion-service credential is read from `ANTHROPIC_API_KEY`.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::constants::{
    API_KEY_ENV, DEFAULT_API_URL, DEFAULT_CONTEXT_CHUNKS, DEFAULT_CORPUS_BASE_URL, DEFAULT_MODEL,
    DEFAULT_SHARD_CAP, DEFAULT_SHARD_GAP_LIMIT,
};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read overrides on top of defaults.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Base location of the corpus objects. Always ends with `/`.
    pub corpus_url: String,

    /// Consecutive shard misses that stop the scan. Default: `2`.
    pub shard_gap_limit: usize,

    /// Maximum number of shard indices probed. Default: `50`.
    pub shard_cap: usize,

    /// Ranked chunks used as grounding context. Default: `30`.
    pub context_chunks: usize,

    /// Completion-service model identifier.
    pub model: String,

    /// Completion-service base URL. Default: `https://api.anthropic.com`.
    pub api_url: String,

    /// Completion-service credential. Never logged.
    pub api_key: Option<String>,

    /// Upper bound on a whole analysis request.
    pub request_timeout: Duration,

    /// Per-call timeout on outbound HTTP (corpus + completion service).
    pub http_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("bind_addr", &self.bind_addr)
            .field("corpus_url", &self.corpus_url)
            .field("shard_gap_limit", &self.shard_gap_limit)
            .field("shard_cap", &self.shard_cap)
            .field("context_chunks", &self.context_chunks)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
/// Default outbound HTTP timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            corpus_url: DEFAULT_CORPUS_BASE_URL.to_string(),
            shard_gap_limit: DEFAULT_SHARD_GAP_LIMIT,
            shard_cap: DEFAULT_SHARD_CAP,
            context_chunks: DEFAULT_CONTEXT_CHUNKS,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "QUIZDOC_PORT";
    const ENV_BIND_ADDR: &'static str = "QUIZDOC_BIND_ADDR";
    const ENV_CORPUS_URL: &'static str = "QUIZDOC_CORPUS_URL";
    const ENV_SHARD_GAP_LIMIT: &'static str = "QUIZDOC_SHARD_GAP_LIMIT";
    const ENV_SHARD_CAP: &'static str = "QUIZDOC_SHARD_CAP";
    const ENV_CONTEXT_CHUNKS: &'static str = "QUIZDOC_CONTEXT_CHUNKS";
    const ENV_MODEL: &'static str = "QUIZDOC_MODEL";
    const ENV_API_URL: &'static str = "QUIZDOC_API_URL";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "QUIZDOC_REQUEST_TIMEOUT_SECS";
    const ENV_HTTP_TIMEOUT_SECS: &'static str = "QUIZDOC_HTTP_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let corpus_url = normalize_base_url(&Self::parse_string_from_env(
            Self::ENV_CORPUS_URL,
            defaults.corpus_url,
        ));
        let shard_gap_limit =
            Self::parse_usize_from_env(Self::ENV_SHARD_GAP_LIMIT, defaults.shard_gap_limit)?;
        let shard_cap = Self::parse_usize_from_env(Self::ENV_SHARD_CAP, defaults.shard_cap)?;
        let context_chunks =
            Self::parse_usize_from_env(Self::ENV_CONTEXT_CHUNKS, defaults.context_chunks)?;
        let model = Self::parse_string_from_env(Self::ENV_MODEL, defaults.model);
        let api_url = Self::parse_string_from_env(Self::ENV_API_URL, defaults.api_url)
            .trim_end_matches('/')
            .to_string();
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let request_timeout = Self::parse_secs_from_env(
            Self::ENV_REQUEST_TIMEOUT_SECS,
            defaults.request_timeout,
        )?;
        let http_timeout =
            Self::parse_secs_from_env(Self::ENV_HTTP_TIMEOUT_SECS, defaults.http_timeout)?;

        Ok(Self {
            port,
            bind_addr,
            corpus_url,
            shard_gap_limit,
            shard_cap,
            context_chunks,
            model,
            api_url,
            api_key,
            request_timeout,
            http_timeout,
        })
    }

    /// Validates limits and URLs (performs no network activity).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            (Self::ENV_SHARD_GAP_LIMIT, self.shard_gap_limit),
            (Self::ENV_SHARD_CAP, self.shard_cap),
            (Self::ENV_CONTEXT_CHUNKS, self.context_chunks),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroLimit { name });
            }
        }

        for (name, value) in [
            (Self::ENV_CORPUS_URL, &self.corpus_url),
            (Self::ENV_API_URL, &self.api_url),
        ] {
            reqwest::Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
                name,
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroLimit {
                name: Self::ENV_REQUEST_TIMEOUT_SECS,
            });
        }

        Ok(())
    }

    /// Returns `true` if the completion-service credential is present.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_secs_from_env(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }
}

/// Ensures a base location ends with exactly one `/` so object names can be appended.
pub fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim().trim_end_matches('/'))
}
