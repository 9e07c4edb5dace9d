pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::onet::handlers as occupations;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Occupation search
        .route(
            "/api/v1/occupations/search",
            get(occupations::handle_search),
        )
        // Analysis API
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route(
            "/api/v1/analyze/stream",
            post(analysis::handle_analyze_stream),
        )
        .with_state(state)
}
