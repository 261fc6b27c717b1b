//! Relay — forward one user message to the ChatKit workflow and return its reply.
//!
//! Sequence for one inbound request:
//!
//! 1. validate the message
//! 2. check that workflow id and API key are configured
//! 3. create a session with the API key
//! 4. send the message with the session's client secret
//!
//! Each step short-circuits with a [`RelayError`]. Nothing is retried and
//! nothing is kept between requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::chatkit::{ChatKitClient, ChatKitError};
use crate::config::ChatKitConfig;

/// Inbound chat request body.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
}

/// Successful relay result, returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub output_text: String,
}

/// Relay failures. `Display` is the caller-facing message.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing message")]
    MissingMessage,

    #[error("Missing workflow ID or API key")]
    Misconfigured,

    #[error("Failed to create ChatKit session")]
    SessionCreationFailed { details: Value },

    #[error("Failed to get reply from workflow")]
    MessageFailed { details: Value },

    /// Anything else. The inner string is for logs only.
    #[error("Unexpected error")]
    Internal(String),
}

impl RelayError {
    /// Raw upstream payload, for the two upstream-rejection kinds only.
    pub fn details(&self) -> Option<&Value> {
        match self {
            RelayError::SessionCreationFailed { details }
            | RelayError::MessageFailed { details } => Some(details),
            _ => None,
        }
    }
}

impl ChatRequest {
    /// Parses and validates a raw request body.
    ///
    /// The body must be a JSON object. An absent or malformed body, a
    /// non-object body, a missing or non-string `message`, and an empty
    /// `message` are all [`RelayError::MissingMessage`].
    pub fn parse(body: &[u8]) -> Result<Self, RelayError> {
        let fields: Map<String, Value> = serde_json::from_slice(body).map_err(|e| {
            debug!(category = ?e.classify(), "rejecting chat request body");
            RelayError::MissingMessage
        })?;

        let message = match fields.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => return Err(RelayError::MissingMessage),
        };

        let request = ChatRequest { message };
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<(), RelayError> {
        if self.message.is_empty() {
            return Err(RelayError::MissingMessage);
        }
        Ok(())
    }
}

/// Runs the session-then-message sequence for one request.
///
/// No outbound call is made unless the message is valid and both the
/// workflow id and API key are configured. The conversation call is only
/// attempted after a session secret has been obtained.
pub async fn relay_message(
    client: &ChatKitClient,
    config: &ChatKitConfig,
    request: &ChatRequest,
) -> Result<ChatReply, RelayError> {
    request.validate()?;

    let creds = config.credentials().ok_or_else(|| {
        warn!("ChatKit workflow ID or API key not configured");
        RelayError::Misconfigured
    })?;

    let secret = client
        .create_session(creds.api_key, creds.workflow_id)
        .await
        .map_err(|e| match e {
            ChatKitError::Rejected {
                status, details, ..
            } => {
                warn!(status, "ChatKit session creation rejected");
                RelayError::SessionCreationFailed { details }
            }
            other => internal("session", other),
        })?;

    let output_text = client
        .send_message(&secret, creds.workflow_id, &request.message)
        .await
        .map_err(|e| match e {
            ChatKitError::Rejected {
                status, details, ..
            } => {
                warn!(status, "ChatKit workflow message rejected");
                RelayError::MessageFailed { details }
            }
            other => internal("message", other),
        })?;

    Ok(ChatReply { output_text })
}

fn internal(step: &'static str, err: ChatKitError) -> RelayError {
    error!(step, error = %err, "ChatKit relay failed");
    RelayError::Internal(err.to_string())
}
