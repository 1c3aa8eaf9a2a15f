use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::EvaluationResult;

/// A complete project snapshot: project-relative path -> full file text.
///
/// Keys are slash-delimited paths (`/App.js`, `/components/Button.js` or bare
/// relative paths); values are the entire textual content of the file. The
/// store only ever holds complete snapshots, never diffs, so replacing one is
/// always safe.
pub type FileMap = BTreeMap<String, String>;

/// Input for generating a new project from a natural-language description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub description: String,
    /// Free-text feature list, e.g. "add, delete, mark tasks as complete".
    #[serde(default)]
    pub features: Option<String>,
    /// When true, the response waits for the judge and attaches its scores.
    /// When absent the server default applies (detached evaluation).
    #[serde(default)]
    pub evaluate: Option<bool>,
}

/// A freshly generated project as carried on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectData {
    pub project_id: String,
    pub files: FileMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationResult>,
}

/// Response for `POST /generate-project`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_data: Option<ProjectData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProjectResponse {
    pub fn ok(project_data: ProjectData) -> Self {
        Self {
            success: true,
            project_data: Some(project_data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            project_data: None,
            error: Some(error.into()),
        }
    }
}

/// Body for `POST /projects/{project_id}/store`: manual seed/import of an
/// externally produced project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProjectRequest {
    pub project_data: FileMap,
}

/// Response for `POST /projects/{project_id}/store`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProjectResponse {
    pub success: bool,
    pub message: String,
    pub project_id: String,
}

/// Response for `GET /projects/{project_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProjectResponse {
    pub success: bool,
    pub project_id: String,
    pub project_data: FileMap,
}
