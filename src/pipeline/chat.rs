//! The modification pipeline: conversational edits against a stored project.

use std::sync::Arc;

use crate::extract;
use crate::llm::{GenerationParams, LlmClient, Message};
use crate::models::{ChatMessage, ChatResponse};
use crate::pipeline::prompts;
use crate::store::ProjectStore;

/// Generic apology for unclassified failures. Raw internals never reach the
/// user on this path; the real error goes to the log.
const APOLOGY: &str =
    "Sorry, an unexpected error occurred. Could you rephrase your request?";

const NOT_FOUND_MESSAGE: &str = "Project not found. Please generate a project first.";

/// Acknowledgment table: (trigger keywords, canned confirmation), evaluated
/// top to bottom against the lowercased user message; first hit wins.
const ACKNOWLEDGMENTS: &[(&[&str], &str)] = &[
    (
        &["color", "colour", "blue", "red", "green", "theme", "background"],
        "Done! I updated the colors of your application. Check the preview to see the changes.",
    ),
    (
        &["logo", "icon", "image", "picture"],
        "Great! I added/updated the logo for your application. Take a look.",
    ),
    (
        &["size", "sizing", "larger", "smaller", "spacing"],
        "All set! I adjusted the sizes and spacing as requested.",
    ),
    (
        &["text", "title", "label", "wording"],
        "Excellent! The text has been updated. You can see the changes in the preview.",
    ),
    (
        &["feature", "function", "add", "support"],
        "Nice! I added the new functionality to your application. Try it out!",
    ),
];

const DEFAULT_ACKNOWLEDGMENT: &str =
    "Modification applied successfully! Check the preview to see the changes.";

/// Pick a canned confirmation by keyword-matching the user's instruction,
/// falling through to a generic acknowledgment.
fn acknowledgment_for(user_message: &str) -> &'static str {
    let message = user_message.to_lowercase();
    ACKNOWLEDGMENTS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| message.contains(k)))
        .map(|(_, response)| *response)
        .unwrap_or(DEFAULT_ACKNOWLEDGMENT)
}

/// Orchestrates conversational modification of stored projects.
pub struct ChatService {
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn ProjectStore>,
    params: GenerationParams,
}

impl ChatService {
    pub fn new(llm: Arc<dyn LlmClient>, store: Arc<dyn ProjectStore>) -> Self {
        Self {
            llm,
            store,
            params: GenerationParams::default(),
        }
    }

    /// Process one user message against a stored project.
    ///
    /// Failure is always non-destructive: whatever goes wrong after the
    /// not-found check, the last-known-good snapshot survives and the
    /// outcome (including apologies) is appended to the ledger as an
    /// assistant turn. Nothing is retried.
    pub async fn process_message(&self, project_id: &str, user_message: &str) -> ChatResponse {
        // Unknown project: no ledger write, no model call.
        let Some(current_project) = self.store.get(project_id) else {
            return ChatResponse::err(NOT_FOUND_MESSAGE, "PROJECT_NOT_FOUND");
        };

        // Record the attempt before invoking the model, so the ledger
        // reflects every request, not just the ones that succeed.
        self.store
            .append_message(project_id, ChatMessage::user(user_message));

        tracing::info!("processing message for project {}: {}", project_id, user_message);

        let prompt = prompts::modification_prompt(user_message, &current_project);
        let output = match self
            .llm
            .complete(&[Message::user(prompt)], &self.params)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("llm call failed during modification: {}", e);
                return self.reply_err(project_id, APOLOGY.to_string(), "INTERNAL_ERROR");
            }
        };

        let modified_project = match extract::extract_file_map(&output) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("extraction failed during modification: {}", e);
                let message = format!("Modification error: {e}");
                return self.reply_err(project_id, message, "MODIFICATION_ERROR");
            }
        };

        let version = match self
            .store
            .commit_modification(project_id, modified_project.clone())
        {
            Ok(version) => version,
            Err(e) => {
                tracing::error!("commit failed for project {}: {}", project_id, e);
                return self.reply_err(project_id, APOLOGY.to_string(), "INTERNAL_ERROR");
            }
        };

        let ack = acknowledgment_for(user_message);
        self.store
            .append_message(project_id, ChatMessage::assistant(ack));

        ChatResponse::ok(ack, modified_project, version)
    }

    fn reply_err(&self, project_id: &str, message: String, code: &str) -> ChatResponse {
        self.store
            .append_message(project_id, ChatMessage::assistant(message.clone()));
        ChatResponse::err(message, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::models::{ChatRole, FileMap};
    use crate::store::MemoryStore;

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let mut files = FileMap::new();
        files.insert("/App.js".to_string(), "original".to_string());
        store.store("p1", files);
        store
    }

    #[test]
    fn acknowledgment_matches_color_category() {
        assert!(acknowledgment_for("make the background blue").contains("colors"));
        assert!(acknowledgment_for("switch to a dark THEME").contains("colors"));
    }

    #[test]
    fn acknowledgment_matches_in_table_order() {
        // "add a red icon" hits the color row before the logo row.
        assert!(acknowledgment_for("add a red icon").contains("colors"));
    }

    #[test]
    fn acknowledgment_falls_through_to_default() {
        assert_eq!(
            acknowledgment_for("do something mysterious"),
            DEFAULT_ACKNOWLEDGMENT
        );
    }

    #[tokio::test]
    async fn unknown_project_leaves_no_ledger_entry() {
        let store = Arc::new(MemoryStore::new());
        let llm = Arc::new(MockLlm::new());
        let service = ChatService::new(llm.clone(), store.clone());

        let response = service.process_message("missing", "make it blue").await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("PROJECT_NOT_FOUND"));
        assert_eq!(llm.call_count(), 0);
        assert!(store.history("missing").is_empty());
    }

    #[tokio::test]
    async fn extraction_failure_keeps_prior_snapshot() {
        let store = seeded_store();
        let llm = Arc::new(MockLlm::with_responses(["no json in this reply"]));
        let service = ChatService::new(llm, store.clone());

        let response = service.process_message("p1", "make it blue").await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("MODIFICATION_ERROR"));
        let (files, version) = store.snapshot("p1").unwrap();
        assert_eq!(version, 1);
        assert_eq!(files["/App.js"], "original");
        // The attempt and the failure reply are both ledgered.
        let history = store.history("p1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[1].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn llm_failure_yields_generic_apology() {
        let store = seeded_store();
        let llm = Arc::new(MockLlm::new());
        llm.push_error("connection reset by provider");
        let service = ChatService::new(llm, store.clone());

        let response = service.process_message("p1", "make it blue").await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("INTERNAL_ERROR"));
        assert_eq!(response.message, APOLOGY);
        // Raw provider detail stays out of the user-facing reply.
        assert!(!response.message.contains("connection reset"));
        assert_eq!(store.snapshot("p1").unwrap().1, 1);
    }

    #[tokio::test]
    async fn successful_modification_commits_and_ledgers_both_turns() {
        let store = seeded_store();
        let llm = Arc::new(MockLlm::with_responses([
            r#"{"/App.js": "blue version"}"#,
        ]));
        let service = ChatService::new(llm, store.clone());

        let response = service.process_message("p1", "make the background blue").await;

        assert!(response.success);
        assert_eq!(response.project_version, Some(2));
        assert!(response.message.contains("colors"));
        let (files, version) = store.snapshot("p1").unwrap();
        assert_eq!(version, 2);
        assert_eq!(files["/App.js"], "blue version");
        assert_eq!(store.history("p1").len(), 2);
    }
}
