//! ChatKit configuration — workflow, credentials, endpoint and timeouts.
//!
//! Built once at process start and passed into the relay. Nothing in the
//! request path reads the process environment.

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default ChatKit API origin.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// Default per-request timeout for outbound ChatKit calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default TCP connect timeout for outbound ChatKit calls.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidApiBase { url: String, reason: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Resolved configuration for talking to the ChatKit API.
///
/// `workflow_id` and `api_key` may be absent here; the relay refuses to make
/// any outbound call until both are present (see [`ChatKitConfig::credentials`]).
#[derive(Clone)]
pub struct ChatKitConfig {
    /// Hosted workflow identifier.
    pub workflow_id: Option<String>,
    /// Long-lived API key. Only ever sent to the session endpoint.
    pub api_key: Option<String>,
    /// API origin without trailing slash.
    pub api_base: String,
    /// Upper bound for each outbound request, connect included.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

/// Borrowed view of the two required values, present and non-empty.
#[derive(Clone, Copy)]
pub struct Credentials<'a> {
    pub workflow_id: &'a str,
    pub api_key: &'a str,
}

impl fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("workflow_id", &self.workflow_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Default for ChatKitConfig {
    fn default() -> Self {
        Self {
            workflow_id: None,
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl fmt::Debug for ChatKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatKitConfig")
            .field("workflow_id", &self.workflow_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl ChatKitConfig {
    /// Builds a config from explicit values, normalizing the API base.
    ///
    /// Empty strings for `workflow_id` or `api_key` are treated as unset.
    pub fn new(
        workflow_id: Option<String>,
        api_key: Option<String>,
        api_base: Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_base = match api_base.filter(|s| !s.trim().is_empty()) {
            Some(base) => normalize_api_base(&base)?,
            None => DEFAULT_API_BASE.to_string(),
        };
        Ok(Self {
            workflow_id: workflow_id.filter(|s| !s.is_empty()),
            api_key: api_key.filter(|s| !s.is_empty()),
            api_base,
            ..Self::default()
        })
    }

    /// Overrides the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reads configuration from environment variables.
    ///
    /// | Variable                          | Default                  |
    /// |-----------------------------------|--------------------------|
    /// | `CHATKIT_WORKFLOW_ID`             | unset                    |
    /// | `NEXT_PUBLIC_CHATKIT_WORKFLOW_ID` | fallback for the above   |
    /// | `OPENAI_API_KEY`                  | unset                    |
    /// | `CHATKIT_API_BASE`                | `https://api.openai.com` |
    /// | `CHATKIT_TIMEOUT_SECS`            | `30`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ChatKitConfig::from_env`], reading through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let workflow_id = lookup("CHATKIT_WORKFLOW_ID")
            .filter(|s| !s.is_empty())
            .or_else(|| lookup("NEXT_PUBLIC_CHATKIT_WORKFLOW_ID"));

        let config = Self::new(
            workflow_id,
            lookup("OPENAI_API_KEY"),
            lookup("CHATKIT_API_BASE"),
        )?;

        match lookup("CHATKIT_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = parse_timeout_secs(&raw).ok_or(ConfigError::InvalidValue {
                    key: "CHATKIT_TIMEOUT_SECS",
                    value: raw,
                })?;
                Ok(config.with_request_timeout(Duration::from_secs(secs)))
            }
            None => Ok(config),
        }
    }

    /// Returns the workflow id and API key if both are configured.
    pub fn credentials(&self) -> Option<Credentials<'_>> {
        Some(Credentials {
            workflow_id: self.workflow_id.as_deref()?,
            api_key: self.api_key.as_deref()?,
        })
    }

    /// Full URL for an API path such as `/v1/chatkit/sessions`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

fn parse_timeout_secs(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0)
}

fn normalize_api_base(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidApiBase {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
