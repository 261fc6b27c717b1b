//! HTTP client for the two ChatKit endpoints.

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use super::types::{CreateSessionRequest, SendMessageRequest};
use super::{
    BETA_HEADER, BETA_HEADER_VALUE, CONVERSATIONS_PATH, ChatKitError, ClientSecret,
    SESSIONS_PATH, non_empty_str,
};
use crate::config::ChatKitConfig;

/// ChatKit API client.
///
/// Cheap to clone; clones share one connection pool. Holds no credentials,
/// every call is given the token it must authenticate with.
#[derive(Clone, Debug)]
pub struct ChatKitClient {
    http: Client,
    sessions_url: String,
    conversations_url: String,
}

impl ChatKitClient {
    /// Builds a client for `config.api_base` with the configured timeouts.
    pub fn new(config: &ChatKitConfig) -> Result<Self, ChatKitError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(ChatKitError::Build)?;

        Ok(Self {
            http,
            sessions_url: config.endpoint(SESSIONS_PATH),
            conversations_url: config.endpoint(CONVERSATIONS_PATH),
        })
    }

    /// `POST /v1/chatkit/sessions` — create a session for `workflow_id`.
    ///
    /// Authenticated with the long-lived `api_key`. File uploads are disabled
    /// for the session.
    pub async fn create_session(
        &self,
        api_key: &str,
        workflow_id: &str,
    ) -> Result<ClientSecret, ChatKitError> {
        let response = self
            .http
            .post(&self.sessions_url)
            .bearer_auth(api_key)
            .header(BETA_HEADER, BETA_HEADER_VALUE)
            .json(&CreateSessionRequest::new(workflow_id))
            .send()
            .await?;

        let (ok, status, body) = read_json(response).await?;
        debug!(status, "ChatKit session response");

        if ok && let Some(secret) = non_empty_str(&body, "client_secret") {
            return Ok(ClientSecret::new(secret));
        }

        Err(ChatKitError::Rejected {
            endpoint: SESSIONS_PATH,
            status,
            details: without_client_secret(body),
        })
    }

    /// `POST /v1/chatkit/conversations` — send `text` to the workflow.
    ///
    /// Authenticated with the session's `secret`, never the API key. Returns
    /// the workflow's `output_text`.
    pub async fn send_message(
        &self,
        secret: &ClientSecret,
        workflow_id: &str,
        text: &str,
    ) -> Result<String, ChatKitError> {
        let response = self
            .http
            .post(&self.conversations_url)
            .bearer_auth(secret.expose())
            .json(&SendMessageRequest::new(workflow_id, text))
            .send()
            .await?;

        let (ok, status, body) = read_json(response).await?;
        debug!(status, "ChatKit conversation response");

        match non_empty_str(&body, "output_text") {
            Some(text) if ok => Ok(text.to_string()),
            _ => Err(ChatKitError::Rejected {
                endpoint: CONVERSATIONS_PATH,
                status,
                details: body,
            }),
        }
    }
}

/// Drops any `client_secret` field so a rejected session body can be surfaced
/// to the caller without the credential in it.
fn without_client_secret(mut body: Value) -> Value {
    if let Some(fields) = body.as_object_mut() {
        fields.remove("client_secret");
    }
    body
}

/// Reads the status and the JSON body. A body that is not JSON is an error
/// regardless of status.
async fn read_json(response: Response) -> Result<(bool, u16, Value), ChatKitError> {
    let status = response.status();
    let body = response.json::<Value>().await?;
    Ok((status.is_success(), status.as_u16(), body))
}
