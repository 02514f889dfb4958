//! Turns a tool invocation into a fully specified outbound HTTP request.
//!
//! Validation happens here, before any network I/O: the absolute-URL policy, the
//! method whitelist of the generic tool and header syntax.

use std::{collections::BTreeMap, fmt, str::FromStr};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = TranslateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == value)
            .ok_or_else(|| TranslateError::UnsupportedMethod(value.to_string()))
    }
}

/// The fixed tool catalog exposed to protocol clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeTool {
    Ping,
    ApiGet,
    ApiPost,
    ApiPatch,
    ApiDelete,
    ApiRequest,
}

impl BridgeTool {
    pub const ALL: [BridgeTool; 6] = [
        BridgeTool::Ping,
        BridgeTool::ApiGet,
        BridgeTool::ApiPost,
        BridgeTool::ApiPatch,
        BridgeTool::ApiDelete,
        BridgeTool::ApiRequest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Ping => "tools.v1.ping",
            Self::ApiGet => "tools.v1.api_get",
            Self::ApiPost => "tools.v1.api_post",
            Self::ApiPatch => "tools.v1.api_patch",
            Self::ApiDelete => "tools.v1.api_delete",
            Self::ApiRequest => "tools.v1.api_request",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Method implied by tool identity; `None` for ping and the generic tool.
    pub fn fixed_method(self) -> Option<HttpMethod> {
        match self {
            Self::ApiGet => Some(HttpMethod::Get),
            Self::ApiPost => Some(HttpMethod::Post),
            Self::ApiPatch => Some(HttpMethod::Patch),
            Self::ApiDelete => Some(HttpMethod::Delete),
            Self::Ping | Self::ApiRequest => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub tool: BridgeTool,
    pub endpoint: String,
    pub method: Option<String>,
    pub body: Option<Value>,
    pub headers: Option<BTreeMap<String, String>>,
}

impl ToolInvocation {
    pub fn new(tool: BridgeTool, endpoint: impl Into<String>) -> Self {
        Self {
            tool,
            endpoint: endpoint.into(),
            method: None,
            body: None,
            headers: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Method as reported back to the caller, even when it failed validation.
    pub fn method_label(&self) -> String {
        match self.tool.fixed_method() {
            Some(method) => method.as_str().to_string(),
            None => self.method.clone().unwrap_or_default(),
        }
    }

    pub fn resolve_method(&self) -> Result<HttpMethod, TranslateError> {
        match (self.tool, self.tool.fixed_method()) {
            (BridgeTool::Ping, _) => Err(TranslateError::NoOutboundCall),
            (_, Some(method)) => Ok(method),
            (_, None) => self.method.as_deref().unwrap_or_default().parse(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("Absolute URLs are not allowed. Use relative endpoints only.")]
    AbsoluteUrlNotAllowed,
    #[error("unsupported method '{0}'; expected one of GET, POST, PUT, PATCH, DELETE")]
    UnsupportedMethod(String),
    #[error("invalid header name '{0}'")]
    InvalidHeaderName(String),
    #[error("invalid value for header '{0}'")]
    InvalidHeaderValue(String),
    #[error("tool does not issue an outbound request")]
    NoOutboundCall,
}

pub fn translate(
    invocation: &ToolInvocation,
    config: &Config,
) -> Result<OutboundRequest, TranslateError> {
    let method = invocation.resolve_method()?;

    if !config.allow_absolute_urls && is_absolute_url(&invocation.endpoint) {
        return Err(TranslateError::AbsoluteUrlNotAllowed);
    }

    let url = compose_url(&config.base_url, &invocation.endpoint);
    let headers = merge_headers(config, invocation.headers.as_ref())?;
    let body = if method.carries_body() {
        invocation
            .body
            .as_ref()
            .filter(|body| !body.is_null())
            .map(Value::to_string)
    } else {
        None
    };

    Ok(OutboundRequest {
        method,
        url,
        headers,
        body,
    })
}

pub fn is_absolute_url(endpoint: &str) -> bool {
    endpoint.starts_with("http://") || endpoint.starts_with("https://")
}

/// No slash deduplication or encoding; endpoints starting with `http` pass through verbatim.
pub fn compose_url(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http") {
        endpoint.to_string()
    } else {
        format!("{base_url}{endpoint}")
    }
}

/// Layers, lowest precedence first: configured defaults, the auth header, caller headers.
/// Header names compare case-insensitively, so a later layer replaces any casing of a key.
pub fn merge_headers(
    config: &Config,
    custom: Option<&BTreeMap<String, String>>,
) -> Result<HeaderMap, TranslateError> {
    let auth_value = format!("{} {}", config.auth_prefix, config.api_key);
    let auth_layer = [(config.auth_header_name.as_str(), auth_value.as_str())];

    let defaults = config
        .default_headers
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()));
    let custom = custom
        .into_iter()
        .flatten()
        .map(|(name, value)| (name.as_str(), value.as_str()));

    let mut headers = HeaderMap::new();
    for (name, value) in defaults.chain(auth_layer).chain(custom) {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| TranslateError::InvalidHeaderName(name.to_string()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| TranslateError::InvalidHeaderValue(name.to_string()))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
