//! Growth coach relay handler — forwards one message to the ChatKit workflow.
//!
//! `POST /api/growth-coach` with `{ "message": "..." }`:
//! 1. Parses the body (400 on anything unusable)
//! 2. Creates a ChatKit session with the server's API key
//! 3. Sends the message with the session's client secret
//! 4. Returns `{ "output_text": "..." }`

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use coach_core::relay::{self, ChatReply, ChatRequest};
use tracing::{debug, info, warn};

use crate::AppState;
use crate::error::{AppError, AppResult};

/// `POST /api/growth-coach` — relay a chat message and return the workflow reply.
///
/// Takes the raw body so a missing or malformed payload maps to the same
/// `Missing message` error as an empty one. Bodies over
/// [`MAX_BODY_BYTES`](crate::MAX_BODY_BYTES) get a JSON 413.
pub async fn growth_coach_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<ChatReply>> {
    let body = body.map_err(body_rejection)?;
    let request = ChatRequest::parse(&body)?;
    debug!(message_len = request.message.len(), "relaying chat message");

    let reply = relay::relay_message(&state.chatkit, &state.config.chatkit, &request).await?;

    info!(reply_len = reply.output_text.len(), "workflow reply relayed");
    Ok(Json(reply))
}

fn body_rejection(rejection: BytesRejection) -> AppError {
    warn!(status = %rejection.status(), "chat request body rejected: {rejection}");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest("Missing message".to_string())
    }
}
