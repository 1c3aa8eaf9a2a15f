use serde::{Deserialize, Serialize};

/// Judge scores for one generated project.
///
/// Each criterion is scored 1-10 by the judge model and normalized on parse:
/// out-of-range or non-numeric values are clamped/defaulted, and an invalid
/// overall score is recomputed as the unweighted mean of the three
/// sub-scores. All-zero scores mean "no project to evaluate", which is
/// distinct from the all-3 fallback emitted when the judge itself failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub code_quality: f64,
    pub requirements_fulfillment: f64,
    pub compliance: f64,
    pub overall_score: f64,
    pub feedback: String,
}

impl EvaluationResult {
    /// Short-circuit result for an empty file mapping. No judge call is made.
    pub fn empty_project() -> Self {
        Self {
            code_quality: 0.0,
            requirements_fulfillment: 0.0,
            compliance: 0.0,
            overall_score: 0.0,
            feedback: "No project generated".to_string(),
        }
    }

    /// Conservative fallback when the judge call or parse failed outright.
    ///
    /// Non-zero so downstream aggregates can tell "judge broken" apart from
    /// "project actually bad".
    pub fn judge_failed(files_count: usize) -> Self {
        Self {
            code_quality: 3.0,
            requirements_fulfillment: 3.0,
            compliance: 3.0,
            overall_score: 3.0,
            feedback: format!(
                "Evaluation failed, but project generated with {} files",
                files_count
            ),
        }
    }
}

/// One generation+judge cycle input for the batch harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub description: String,
    #[serde(default)]
    pub features: String,
}

/// Body for `POST /evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub test_cases: Option<Vec<TestCase>>,
    #[serde(default = "default_true")]
    pub use_default_cases: bool,
}

fn default_true() -> bool {
    true
}

/// Outcome of one batch test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub test_case_id: usize,
    pub description: String,
    pub features: String,
    pub generated_files_count: usize,
    pub evaluation: EvaluationResult,
}

/// Rollup over a batch run. Per-criterion averages are taken over successful
/// cases only (overall score > 0); `success_rate` is the share of successful
/// cases scoring at least 7.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub total_test_cases: usize,
    pub successful_cases: usize,
    pub failure_rate: f64,
    pub avg_overall_score: f64,
    pub avg_code_quality: f64,
    pub avg_requirements_fulfillment: f64,
    pub avg_compliance: f64,
    pub success_rate: f64,
    pub generated_files_avg: f64,
}

/// Full batch outcome: per-case results plus the rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResults {
    pub results: Vec<CaseResult>,
    pub overall_metrics: AggregateMetrics,
}

/// Response for `POST /evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<EvaluationResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for `GET /evaluation/test-cases`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultCasesResponse {
    pub success: bool,
    pub test_cases: Vec<TestCase>,
    pub count: usize,
}
