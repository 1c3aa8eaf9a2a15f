//! Per-project versioned state and the conversation ledger.
//!
//! The storage backend sits behind [`ProjectStore`] so a durable
//! implementation can be injected later without touching pipeline logic;
//! [`MemoryStore`] is the process-lifetime default. Projects are never
//! deleted; they age out only on process restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;

use crate::models::{ChatMessage, FileMap};

/// Store failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("project not found")]
    ProjectNotFound,
}

/// Keyed project state: complete file snapshots with a version counter, plus
/// the append-only chat ledger.
pub trait ProjectStore: Send + Sync {
    /// Create or overwrite a project at version 1. Idempotent; an existing
    /// chat history is kept, a missing one is initialized empty.
    fn store(&self, project_id: &str, files: FileMap);

    /// Current file mapping, or `None` for an unknown id.
    fn get(&self, project_id: &str) -> Option<FileMap>;

    /// Consistent (file mapping, version) pair, or `None` for an unknown id.
    fn snapshot(&self, project_id: &str) -> Option<(FileMap, u64)>;

    /// Atomically replace the file mapping and bump the version by one.
    /// Returns the new version. The replacement and the increment are
    /// observed as a single step; a reader never sees a version that does
    /// not match its mapping.
    fn commit_modification(&self, project_id: &str, files: FileMap) -> Result<u64, StoreError>;

    /// Append to the project's conversation ledger, creating it lazily.
    fn append_message(&self, project_id: &str, message: ChatMessage);

    /// The project's conversation ledger in insertion order; empty for an
    /// unknown id.
    fn history(&self, project_id: &str) -> Vec<ChatMessage>;
}

#[derive(Debug)]
struct ProjectEntry {
    files: FileMap,
    version: u64,
}

/// In-memory [`ProjectStore`].
///
/// Each project entry lives behind its own mutex inside an outer read-write
/// locked map: commits serialize per project id while requests for distinct
/// ids proceed fully in parallel. No lock is ever held across an await;
/// pipelines take a snapshot, run the (slow) model call, then commit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: RwLock<HashMap<String, Arc<Mutex<ProjectEntry>>>>,
    chats: RwLock<HashMap<String, Arc<Mutex<Vec<ChatMessage>>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn project_entry(&self, project_id: &str) -> Option<Arc<Mutex<ProjectEntry>>> {
        self.projects
            .read()
            .expect("project map lock poisoned")
            .get(project_id)
            .cloned()
    }

    fn chat_entry(&self, project_id: &str) -> Arc<Mutex<Vec<ChatMessage>>> {
        if let Some(entry) = self
            .chats
            .read()
            .expect("chat map lock poisoned")
            .get(project_id)
        {
            return Arc::clone(entry);
        }
        let mut chats = self.chats.write().expect("chat map lock poisoned");
        Arc::clone(chats.entry(project_id.to_string()).or_default())
    }
}

impl ProjectStore for MemoryStore {
    fn store(&self, project_id: &str, files: FileMap) {
        let files_count = files.len();
        {
            let mut projects = self.projects.write().expect("project map lock poisoned");
            projects.insert(
                project_id.to_string(),
                Arc::new(Mutex::new(ProjectEntry { files, version: 1 })),
            );
        }
        // Initialize the ledger if this is the first time we see the id.
        self.chat_entry(project_id);
        tracing::info!("project {} stored with {} files", project_id, files_count);
    }

    fn get(&self, project_id: &str) -> Option<FileMap> {
        self.snapshot(project_id).map(|(files, _)| files)
    }

    fn snapshot(&self, project_id: &str) -> Option<(FileMap, u64)> {
        let entry = self.project_entry(project_id)?;
        let entry = entry.lock().expect("project entry lock poisoned");
        Some((entry.files.clone(), entry.version))
    }

    fn commit_modification(&self, project_id: &str, files: FileMap) -> Result<u64, StoreError> {
        let entry = self
            .project_entry(project_id)
            .ok_or(StoreError::ProjectNotFound)?;
        let mut entry = entry.lock().expect("project entry lock poisoned");
        entry.files = files;
        entry.version += 1;
        Ok(entry.version)
    }

    fn append_message(&self, project_id: &str, message: ChatMessage) {
        let entry = self.chat_entry(project_id);
        entry
            .lock()
            .expect("chat entry lock poisoned")
            .push(message);
    }

    fn history(&self, project_id: &str) -> Vec<ChatMessage> {
        match self
            .chats
            .read()
            .expect("chat map lock poisoned")
            .get(project_id)
        {
            Some(entry) => entry.lock().expect("chat entry lock poisoned").clone(),
            None => Vec::new(),
        }
    }
}
