use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and catalog counts.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let stats = state.catalog.stats();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "workscope-api",
        "catalog": {
            "occupations": stats.occupations,
            "taskStatements": stats.task_statements,
            "searchableTitles": stats.searchable_titles,
        }
    }))
}
