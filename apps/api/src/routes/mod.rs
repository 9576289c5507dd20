pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/analyze", post(handlers::handle_analyze))
        .route("/skills", post(handlers::handle_skills))
        .route("/extract", post(handlers::handle_extract))
        .with_state(state)
}
