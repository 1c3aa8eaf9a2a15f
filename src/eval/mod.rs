//! LLM-as-judge scoring and the batch evaluation harness.
//!
//! The judge is an opaque scoring oracle: it gets the original request plus
//! a size-bounded excerpt of the generated project and replies with one JSON
//! object of criterion scores. Whatever it replies is normalized into
//! [`EvaluationResult`]; the adapter never fails, it degrades.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::extract;
use crate::llm::{GenerationParams, LlmClient, Message};
use crate::models::{
    AggregateMetrics, CaseResult, EvaluationResult, EvaluationResults, FileMap, TestCase,
};
use crate::pipeline::ProjectGenerator;

/// At most this many files are excerpted into the judge prompt; the rest are
/// only named, marked "(truncated)".
const MAX_FILES_IN_PROMPT: usize = 5;
/// Per-file character budget inside the prompt.
const MAX_CHARS_PER_FILE: usize = 1000;

/// A successful case needs at least this overall score to count towards the
/// success rate.
const SUCCESS_THRESHOLD: f64 = 7.0;

/// Judge adapter: one LLM call, one normalized score set.
pub struct Judge {
    llm: Arc<dyn LlmClient>,
    params: GenerationParams,
}

impl Judge {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            params: GenerationParams::default(),
        }
    }

    /// Score a generated project against the request that produced it.
    ///
    /// An empty file mapping short-circuits to the all-zero result without
    /// any model call; a judge call or parse failure degrades to the all-3
    /// fallback. Neither path is an error for the caller.
    pub async fn judge(&self, case: &TestCase, files: &FileMap) -> EvaluationResult {
        if files.is_empty() {
            return EvaluationResult::empty_project();
        }

        let prompt = self.build_prompt(case, files);
        let output = match self
            .llm
            .complete(&[Message::user(prompt)], &self.params)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("judge call failed: {}", e);
                return EvaluationResult::judge_failed(files.len());
            }
        };

        match extract::extract_object(&output) {
            Ok(scores) => normalize_scores(scores),
            Err(e) => {
                tracing::warn!("judge reply had no parseable scores: {}", e);
                EvaluationResult::judge_failed(files.len())
            }
        }
    }

    fn build_prompt(&self, case: &TestCase, files: &FileMap) -> String {
        let mut project_content = String::new();
        for (i, (path, content)) in files.iter().enumerate() {
            if i < MAX_FILES_IN_PROMPT {
                let excerpt: String = content.chars().take(MAX_CHARS_PER_FILE).collect();
                project_content.push_str(&format!("\n--- {path} ---\n{excerpt}...\n"));
            } else {
                project_content.push_str(&format!("\n--- {path} --- (truncated)\n"));
            }
        }

        let features = if case.features.is_empty() {
            "None specified"
        } else {
            &case.features
        };

        format!(
            r#"Evaluate this React project generation:

USER REQUEST:
Description: {description}
Features: {features}

GENERATED PROJECT ({count} files):
{project_content}

EVALUATION CRITERIA (Score 1-10 each):

1. CODE QUALITY: Clean code, proper structure, correct syntax
2. REQUIREMENTS FULFILLMENT: Matches user description and features
3. COMPLIANCE: Follows the requested project conventions

RESPOND ONLY WITH THIS JSON:
{{
    "code_quality": <score 1-10>,
    "requirements_fulfillment": <score 1-10>,
    "compliance": <score 1-10>,
    "overall_score": <average of above>,
    "feedback": "<brief explanation>"
}}"#,
            description = case.description,
            features = features,
            count = files.len(),
        )
    }
}

/// Normalize a raw judge object into a well-formed result: missing numeric
/// fields default to 5, anything non-numeric or out of range is clamped into
/// [1, 10], and a missing/invalid/non-positive overall score is recomputed
/// as the unweighted mean of the three sub-scores.
fn normalize_scores(scores: Map<String, Value>) -> EvaluationResult {
    let code_quality = clamp_score(scores.get("code_quality"));
    let requirements_fulfillment = clamp_score(scores.get("requirements_fulfillment"));
    let compliance = clamp_score(scores.get("compliance"));

    let overall_score = match scores.get("overall_score").and_then(Value::as_f64) {
        Some(v) if v > 0.0 => v.clamp(1.0, 10.0),
        _ => (code_quality + requirements_fulfillment + compliance) / 3.0,
    };

    let feedback = scores
        .get("feedback")
        .and_then(Value::as_str)
        .unwrap_or("No feedback provided")
        .to_string();

    EvaluationResult {
        code_quality,
        requirements_fulfillment,
        compliance,
        overall_score,
        feedback,
    }
}

fn clamp_score(value: Option<&Value>) -> f64 {
    match value.and_then(Value::as_f64) {
        Some(v) => v.clamp(1.0, 10.0),
        None => 5.0,
    }
}

/// Built-in generation+judge cycles for `POST /evaluate`.
pub fn default_test_cases() -> Vec<TestCase> {
    vec![
        TestCase {
            description: "Todo list application".to_string(),
            features: "Add, delete, mark tasks as complete".to_string(),
        },
        TestCase {
            description: "Simple calculator".to_string(),
            features: "Basic arithmetic operations".to_string(),
        },
        TestCase {
            description: "Counter app".to_string(),
            features: "Increment, decrement, reset counter".to_string(),
        },
    ]
}

/// Batch harness: runs generation+judge cycles and aggregates the outcome.
pub struct Evaluator {
    generator: Arc<ProjectGenerator>,
    judge: Arc<Judge>,
}

impl Evaluator {
    pub fn new(generator: Arc<ProjectGenerator>, judge: Arc<Judge>) -> Self {
        Self { generator, judge }
    }

    /// Generate and judge every test case, then roll up the metrics.
    ///
    /// A failed generation scores zero for its case rather than aborting the
    /// batch; the judge is invoked inline here since the whole endpoint is
    /// an offline measurement run.
    pub async fn run(&self, test_cases: &[TestCase]) -> EvaluationResults {
        let mut results = Vec::with_capacity(test_cases.len());

        for (i, case) in test_cases.iter().enumerate() {
            tracing::info!("evaluating test case {}/{}", i + 1, test_cases.len());

            let result = match self
                .generator
                .generate(&case.description, &case.features, Some(false))
                .await
            {
                Ok(generated) => {
                    let evaluation = self.judge.judge(case, &generated.files).await;
                    CaseResult {
                        test_case_id: i,
                        description: case.description.clone(),
                        features: case.features.clone(),
                        generated_files_count: generated.files.len(),
                        evaluation,
                    }
                }
                Err(e) => {
                    tracing::error!("test case {} generation failed: {}", i, e);
                    CaseResult {
                        test_case_id: i,
                        description: case.description.clone(),
                        features: case.features.clone(),
                        generated_files_count: 0,
                        evaluation: EvaluationResult {
                            code_quality: 0.0,
                            requirements_fulfillment: 0.0,
                            compliance: 0.0,
                            overall_score: 0.0,
                            feedback: format!("Evaluation failed: {e}"),
                        },
                    }
                }
            };
            results.push(result);
        }

        let overall_metrics = aggregate(&results);
        EvaluationResults {
            results,
            overall_metrics,
        }
    }
}

/// Roll per-case results up into batch metrics. Averages are taken over the
/// successful cases only (overall score > 0).
fn aggregate(results: &[CaseResult]) -> AggregateMetrics {
    let total = results.len();
    let successful: Vec<&CaseResult> = results
        .iter()
        .filter(|r| r.evaluation.overall_score > 0.0)
        .collect();

    if successful.is_empty() {
        return AggregateMetrics {
            total_test_cases: total,
            successful_cases: 0,
            failure_rate: 1.0,
            avg_overall_score: 0.0,
            avg_code_quality: 0.0,
            avg_requirements_fulfillment: 0.0,
            avg_compliance: 0.0,
            success_rate: 0.0,
            generated_files_avg: 0.0,
        };
    }

    let n = successful.len() as f64;
    let avg = |f: fn(&EvaluationResult) -> f64| -> f64 {
        successful.iter().map(|r| f(&r.evaluation)).sum::<f64>() / n
    };

    AggregateMetrics {
        total_test_cases: total,
        successful_cases: successful.len(),
        failure_rate: (total - successful.len()) as f64 / total as f64,
        avg_overall_score: avg(|e| e.overall_score),
        avg_code_quality: avg(|e| e.code_quality),
        avg_requirements_fulfillment: avg(|e| e.requirements_fulfillment),
        avg_compliance: avg(|e| e.compliance),
        success_rate: successful
            .iter()
            .filter(|r| r.evaluation.overall_score >= SUCCESS_THRESHOLD)
            .count() as f64
            / n,
        generated_files_avg: results.iter().map(|r| r.generated_files_count).sum::<usize>() as f64
            / total as f64,
    }
}
