//! The generation pipeline: description -> LLM -> file mapping -> stored
//! project, with optional judge evaluation on the side.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::eval::Judge;
use crate::extract::{self, ExtractError};
use crate::llm::{GenerationParams, LlmClient, LlmError, Message};
use crate::models::{EvaluationResult, FileMap, TestCase};
use crate::pipeline::prompts;
use crate::store::ProjectStore;

/// Generation failures. No project is created on any of these.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Extraction(#[from] ExtractError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// A successful generation outcome.
#[derive(Debug)]
pub struct GeneratedProject {
    pub project_id: String,
    pub files: FileMap,
    /// Present only when the caller asked to wait for the judge.
    pub evaluation: Option<EvaluationResult>,
}

/// Orchestrates fresh project builds.
pub struct ProjectGenerator {
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn ProjectStore>,
    judge: Arc<Judge>,
    params: GenerationParams,
    /// Whether generations are judged at all when the request does not say.
    auto_evaluate: bool,
}

impl ProjectGenerator {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn ProjectStore>,
        judge: Arc<Judge>,
        auto_evaluate: bool,
    ) -> Self {
        Self {
            llm,
            store,
            judge,
            params: GenerationParams::default(),
            auto_evaluate,
        }
    }

    /// Generate a project, store it at version 1 under a fresh id, and
    /// dispatch evaluation.
    ///
    /// Evaluation always runs on its own task with its own error boundary.
    /// With `attach_evaluation` the task is awaited and its result attached
    /// to the outcome (a broken judge degrades to the fallback scores, never
    /// to a generation failure); otherwise the task completes detached and
    /// its scores are only logged, so judge latency never delays the caller.
    pub async fn generate(
        &self,
        description: &str,
        features: &str,
        attach_evaluation: Option<bool>,
    ) -> Result<GeneratedProject, GenerateError> {
        tracing::info!("generating project for: {}", description);

        let prompt = prompts::generation_prompt(description, features);
        let output = self
            .llm
            .complete(&[Message::user(prompt)], &self.params)
            .await?;
        let files = extract::extract_file_map(&output)?;

        let project_id = Uuid::new_v4().to_string();
        self.store.store(&project_id, files.clone());

        let evaluation = match (attach_evaluation, self.auto_evaluate) {
            (Some(false), _) | (None, false) => None,
            (Some(true), _) => Some(self.spawn_judge(description, features, &files).await),
            (None, true) => {
                // Fire and forget: the judge runs behind the response path.
                let judge = Arc::clone(&self.judge);
                let case = TestCase {
                    description: description.to_string(),
                    features: features.to_string(),
                };
                let files = files.clone();
                let id = project_id.clone();
                tokio::spawn(async move {
                    let result = judge.judge(&case, &files).await;
                    tracing::info!(
                        "project {} evaluated in background: {:.2}/10",
                        id,
                        result.overall_score
                    );
                });
                None
            }
        };

        Ok(GeneratedProject {
            project_id,
            files,
            evaluation,
        })
    }

    async fn spawn_judge(
        &self,
        description: &str,
        features: &str,
        files: &FileMap,
    ) -> EvaluationResult {
        let judge = Arc::clone(&self.judge);
        let case = TestCase {
            description: description.to_string(),
            features: features.to_string(),
        };
        let files_count = files.len();
        let files = files.clone();
        let handle = tokio::spawn(async move { judge.judge(&case, &files).await });
        match handle.await {
            Ok(result) => {
                tracing::info!("project evaluated: {:.2}/10", result.overall_score);
                result
            }
            Err(e) => {
                tracing::error!("evaluation task failed: {}", e);
                EvaluationResult::judge_failed(files_count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::store::MemoryStore;

    fn generator(llm: Arc<MockLlm>, store: Arc<MemoryStore>) -> ProjectGenerator {
        let judge = Arc::new(Judge::new(llm.clone()));
        ProjectGenerator::new(llm, store, judge, false)
    }

    #[tokio::test]
    async fn stores_generated_project_at_version_one() {
        let llm = Arc::new(MockLlm::with_responses([
            r#"{"/App.js": "app", "/index.js": "index"}"#,
        ]));
        let store = Arc::new(MemoryStore::new());
        let result = generator(llm, store.clone())
            .generate("todo app", "add/delete/complete tasks", None)
            .await
            .expect("generation failed");

        assert_eq!(result.files.len(), 2);
        assert!(result.evaluation.is_none());
        let (files, version) = store.snapshot(&result.project_id).expect("not stored");
        assert_eq!(version, 1);
        assert_eq!(files, result.files);
    }

    #[tokio::test]
    async fn extraction_failure_creates_no_project() {
        let llm = Arc::new(MockLlm::with_responses(["sorry, I cannot help with that"]));
        let store = Arc::new(MemoryStore::new());
        let err = generator(llm, store)
            .generate("todo app", "", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Extraction(ExtractError::NoStructuredDataFound)
        ));
    }

    #[tokio::test]
    async fn attached_evaluation_degrades_on_judge_failure() {
        let llm = Arc::new(MockLlm::with_responses([r#"{"/App.js": "app"}"#]));
        // Judge call has no scripted response, so it fails and falls back.
        let store = Arc::new(MemoryStore::new());
        let result = generator(llm, store)
            .generate("todo app", "", Some(true))
            .await
            .expect("generation failed");

        let eval = result.evaluation.expect("evaluation missing");
        assert_eq!(eval.overall_score, 3.0);
        assert!(eval.feedback.contains("Evaluation failed"));
    }
}
