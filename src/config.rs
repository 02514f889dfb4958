use std::{collections::BTreeMap, env, fmt, net::SocketAddr, time::Duration};

use reqwest::header::{HeaderName, HeaderValue};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

pub const REQUIRED_VARS: [&str; 8] = [
    "PORT",
    "API_BASE_URL",
    "API_KEY",
    "API_AUTH_HEADER",
    "API_AUTH_PREFIX",
    "API_TIMEOUT_S",
    "MCP_SERVER_NAME",
    "MCP_SERVER_VERSION",
];

/// Runtime settings resolved once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub base_url: String,
    pub api_key: String,
    pub auth_header_name: String,
    pub auth_prefix: String,
    pub timeout_seconds: u64,
    pub allow_absolute_urls: bool,
    pub default_headers: BTreeMap<String, String>,
    pub server_name: String,
    pub server_version: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<&'static str>),
    #[error("API_DEFAULT_HEADERS_JSON must be a JSON object of string values: {0}")]
    InvalidDefaultHeaders(#[source] serde_json::Error),
    #[error("{setting} contains an invalid header name '{name}'")]
    InvalidHeaderName { setting: &'static str, name: String },
    #[error("{setting} yields an invalid value for header '{name}'")]
    InvalidHeaderValue { setting: &'static str, name: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let missing = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|name| present(*name).is_none())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let default_headers = match present("API_DEFAULT_HEADERS_JSON") {
            Some(raw) => serde_json::from_str::<BTreeMap<String, String>>(&raw)
                .map_err(ConfigError::InvalidDefaultHeaders)?,
            None => BTreeMap::new(),
        };

        let port = present("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let timeout_seconds = present("API_TIMEOUT_S")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|seconds| *seconds > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        let allow_absolute_urls = present("API_ALLOW_ABSOLUTE_URLS")
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));

        let required = |name: &str| present(name).unwrap_or_default();

        for (name, value) in &default_headers {
            check_header("API_DEFAULT_HEADERS_JSON", name, value)?;
        }
        let auth_header_name = required("API_AUTH_HEADER");
        let auth_value = format!("{} {}", required("API_AUTH_PREFIX"), required("API_KEY"));
        check_header("API_AUTH_HEADER", &auth_header_name, &auth_value)?;

        Ok(Self {
            port,
            base_url: required("API_BASE_URL"),
            api_key: required("API_KEY"),
            auth_header_name,
            auth_prefix: required("API_AUTH_PREFIX"),
            timeout_seconds,
            allow_absolute_urls,
            default_headers,
            server_name: required("MCP_SERVER_NAME"),
            server_version: required("MCP_SERVER_VERSION"),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn health_socket(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Headers that would fail on every outbound call are rejected at startup instead.
fn check_header(setting: &'static str, name: &str, value: &str) -> Result<(), ConfigError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| ConfigError::InvalidHeaderName {
        setting,
        name: name.to_string(),
    })?;
    HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeaderValue {
        setting,
        name: name.to_string(),
    })?;
    Ok(())
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("auth_header_name", &self.auth_header_name)
            .field("auth_prefix", &self.auth_prefix)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("allow_absolute_urls", &self.allow_absolute_urls)
            .field("default_headers", &self.default_headers.keys().collect::<Vec<_>>())
            .field("server_name", &self.server_name)
            .field("server_version", &self.server_version)
            .finish()
    }
}
