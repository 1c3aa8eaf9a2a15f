use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::api::AppState;
use crate::eval::default_test_cases;
use crate::models::*;
use crate::pipeline::GenerateError;

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Generation
// ============================================================

/// Generate a fresh project from a natural-language description.
///
/// Extraction failures carry their detail to the client (the model replied,
/// just not with a usable file mapping); provider failures are logged in full
/// and surfaced as a generic message.
pub async fn generate_project(
    State(state): State<AppState>,
    Json(request): Json<ProjectRequest>,
) -> Json<ProjectResponse> {
    let features = request.features.as_deref().unwrap_or("");
    match state
        .generator
        .generate(&request.description, features, request.evaluate)
        .await
    {
        Ok(generated) => Json(ProjectResponse::ok(ProjectData {
            project_id: generated.project_id,
            files: generated.files,
            evaluation: generated.evaluation,
        })),
        Err(e @ GenerateError::Extraction(_)) => {
            tracing::warn!("generation produced no usable project: {}", e);
            Json(ProjectResponse::err(format!("Generation error: {e}")))
        }
        Err(GenerateError::Llm(e)) => {
            tracing::error!("llm call failed during generation: {}", e);
            Json(ProjectResponse::err(
                "Project generation failed, please try again",
            ))
        }
    }
}

// ============================================================
// Conversational Modification
// ============================================================

/// Chat replies are always 200; failure is expressed in the body so the
/// conversational client renders apologies like any other assistant turn.
pub async fn chat(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    Json(state.chat.process_message(&project_id, &request.message).await)
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectHistoryResponse>, (StatusCode, String)> {
    let current_project = state
        .store
        .get(&project_id)
        .ok_or((StatusCode::NOT_FOUND, "Project not found".to_string()))?;

    Ok(Json(ProjectHistoryResponse {
        success: true,
        project_id: project_id.clone(),
        chat_history: state.store.history(&project_id),
        current_project,
    }))
}

// ============================================================
// Project Store
// ============================================================

/// Seed or overwrite a project snapshot directly, bypassing generation.
pub async fn store_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(request): Json<StoreProjectRequest>,
) -> Json<StoreProjectResponse> {
    state.store.store(&project_id, request.project_data);
    Json(StoreProjectResponse {
        success: true,
        message: "Project stored successfully".to_string(),
        project_id,
    })
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<GetProjectResponse>, (StatusCode, String)> {
    let project_data = state
        .store
        .get(&project_id)
        .ok_or((StatusCode::NOT_FOUND, "Project not found".to_string()))?;

    Ok(Json(GetProjectResponse {
        success: true,
        project_id,
        project_data,
    }))
}

// ============================================================
// Evaluation
// ============================================================

pub async fn run_evaluation(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Json<EvaluationResponse> {
    let cases = match request.test_cases {
        Some(cases) if !cases.is_empty() => cases,
        _ if request.use_default_cases => default_test_cases(),
        _ => {
            return Json(EvaluationResponse {
                success: false,
                results: None,
                error: Some("No test cases provided".to_string()),
            })
        }
    };

    let results = state.evaluator.run(&cases).await;
    Json(EvaluationResponse {
        success: true,
        results: Some(results),
        error: None,
    })
}

pub async fn get_test_cases() -> Json<DefaultCasesResponse> {
    let test_cases = default_test_cases();
    Json(DefaultCasesResponse {
        success: true,
        count: test_cases.len(),
        test_cases,
    })
}
