use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::FileMap;

/// Who authored a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One immutable entry in a project's conversation ledger.
///
/// The ledger is append-only: entries are never mutated or removed, and their
/// insertion order is the conversation order. A user message is recorded
/// *before* the model is invoked, so the ledger reflects every attempt, not
/// just the ones that succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Body for `POST /chat/{project_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response for `POST /chat/{project_id}`.
///
/// `message` is always a user-facing sentence, whether the modification
/// succeeded or not. On success `updated_project` and `project_version` carry
/// the committed snapshot; on failure `error` carries a machine-readable code
/// (`PROJECT_NOT_FOUND`, `MODIFICATION_ERROR`, `INTERNAL_ERROR`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_project: Option<FileMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_version: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn ok(message: impl Into<String>, updated_project: FileMap, version: u64) -> Self {
        Self {
            success: true,
            message: message.into(),
            updated_project: Some(updated_project),
            project_version: Some(version),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>, code: &str) -> Self {
        Self {
            success: false,
            message: message.into(),
            updated_project: None,
            project_version: None,
            error: Some(code.to_string()),
        }
    }
}

/// Response for `GET /chat/{project_id}/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectHistoryResponse {
    pub success: bool,
    pub project_id: String,
    pub chat_history: Vec<ChatMessage>,
    pub current_project: FileMap,
}
