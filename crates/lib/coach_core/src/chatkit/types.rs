//! Request bodies sent to the ChatKit API.
//!
//! Responses are kept as raw [`serde_json::Value`] so the full upstream
//! payload can be surfaced as diagnostics when a required field is missing.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WorkflowRef<'a> {
    pub id: &'a str,
}

/// Body of `POST /v1/chatkit/sessions`.
#[derive(Debug, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub workflow: WorkflowRef<'a>,
    pub chatkit_configuration: SessionConfiguration,
}

#[derive(Debug, Serialize)]
pub struct SessionConfiguration {
    pub file_upload: FileUpload,
}

#[derive(Debug, Serialize)]
pub struct FileUpload {
    pub enabled: bool,
}

impl<'a> CreateSessionRequest<'a> {
    /// Session for `workflow_id` with file uploads disabled.
    pub fn new(workflow_id: &'a str) -> Self {
        Self {
            workflow: WorkflowRef { id: workflow_id },
            chatkit_configuration: SessionConfiguration {
                file_upload: FileUpload { enabled: false },
            },
        }
    }
}

/// Body of `POST /v1/chatkit/conversations`.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub input: MessageInput<'a>,
    pub workflow: WorkflowRef<'a>,
}

#[derive(Debug, Serialize)]
pub struct MessageInput<'a> {
    pub text: &'a str,
}

impl<'a> SendMessageRequest<'a> {
    pub fn new(workflow_id: &'a str, text: &'a str) -> Self {
        Self {
            input: MessageInput { text },
            workflow: WorkflowRef { id: workflow_id },
        }
    }
}
