pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::tailoring::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Page
        .route("/", get(handlers::handle_page))
        .route("/generate", post(handlers::handle_generate_page))
        .route("/feedback", post(handlers::handle_feedback_page))
        // JSON API
        .route("/api/v1/generate", post(handlers::handle_generate))
        .route("/api/v1/feedback", post(handlers::handle_feedback))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session),
        )
        .route("/api/v1/templates", get(handlers::handle_list_templates))
        .with_state(state)
}
