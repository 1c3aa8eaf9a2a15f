mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::eval::{Evaluator, Judge};
use crate::llm::LlmClient;
use crate::pipeline::{ChatService, ProjectGenerator};
use crate::store::ProjectStore;

/// Shared handler state: the store plus the three services built on it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
    pub generator: Arc<ProjectGenerator>,
    pub chat: Arc<ChatService>,
    pub evaluator: Arc<Evaluator>,
}

impl AppState {
    pub fn new(llm: Arc<dyn LlmClient>, store: Arc<dyn ProjectStore>, auto_evaluate: bool) -> Self {
        let judge = Arc::new(Judge::new(llm.clone()));
        let generator = Arc::new(ProjectGenerator::new(
            llm.clone(),
            store.clone(),
            judge.clone(),
            auto_evaluate,
        ));
        let chat = Arc::new(ChatService::new(llm, store.clone()));
        let evaluator = Arc::new(Evaluator::new(generator.clone(), judge));
        Self {
            store,
            generator,
            chat,
            evaluator,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Generation
        .route("/generate-project", post(handlers::generate_project))
        // Conversational modification
        .route("/chat/{project_id}", post(handlers::chat))
        .route("/chat/{project_id}/history", get(handlers::get_history))
        // Project store
        .route("/projects/{project_id}/store", post(handlers::store_project))
        .route("/projects/{project_id}", get(handlers::get_project))
        // Evaluation
        .route("/evaluate", post(handlers::run_evaluation))
        .route("/evaluation/test-cases", get(handlers::get_test_cases))
        // Health
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
