//! ChatKit API client — session creation and workflow messages.
//!
//! The hosted workflow is driven in two calls:
//!
//! 1. `POST /v1/chatkit/sessions`, authenticated with the long-lived API key,
//!    yields a short-lived [`ClientSecret`].
//! 2. `POST /v1/chatkit/conversations`, authenticated with that secret,
//!    carries the user's text and returns the workflow reply.
//!
//! # Public API
//!
//! - [`ChatKitClient`] — reusable HTTP client bound to one API base
//! - [`ClientSecret`] — session credential, redacted in `Debug`
//! - [`ChatKitError`] — upstream rejection vs. transport failure

pub mod client;
pub mod types;

use std::fmt;

use serde_json::Value;
use thiserror::Error;

pub use client::ChatKitClient;

/// Path of the session-creation endpoint.
pub const SESSIONS_PATH: &str = "/v1/chatkit/sessions";

/// Path of the workflow conversation endpoint.
pub const CONVERSATIONS_PATH: &str = "/v1/chatkit/conversations";

/// Beta marker header required by the session endpoint.
pub const BETA_HEADER: &str = "OpenAI-Beta";
pub const BETA_HEADER_VALUE: &str = "chatkit_beta=v1";

/// Errors that can occur while calling ChatKit.
#[derive(Debug, Error)]
pub enum ChatKitError {
    /// Upstream answered with a non-success status, or with a success status
    /// but without the field the caller needs. `details` is the raw body.
    #[error("ChatKit {endpoint} call rejected (status {status})")]
    Rejected {
        endpoint: &'static str,
        status: u16,
        details: Value,
    },

    /// Transport failure, timeout, or a body that is not JSON.
    #[error("ChatKit request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to build ChatKit HTTP client: {0}")]
    Build(reqwest::Error),
}

/// Short-lived bearer token scoped to one ChatKit session.
///
/// Not `Serialize`: it only leaves the process as the `Authorization` header
/// of the follow-up conversation call.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub(crate) fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(<redacted>)")
    }
}

/// Returns `body[field]` if it is a non-empty string.
fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
