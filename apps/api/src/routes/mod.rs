pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Role taxonomy
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        // Résumé intake
        .route("/api/v1/resume/extract", post(handlers::handle_extract))
        .route("/api/v1/resume/score", post(handlers::handle_score))
        .route("/api/v1/resume/upload", post(handlers::handle_upload))
        .route("/api/v1/resume/analyze", post(handlers::handle_analyze))
        // Gap analysis & pathways
        .route("/api/v1/gap-analysis", post(handlers::handle_gap_analysis))
        .route("/api/v1/recommendations", post(handlers::handle_recommendations))
        .route("/api/v1/pathways/tree", post(handlers::handle_pathway_tree))
        .with_state(state)
}
