use std::sync::Arc;

use crate::analysis::AnalysisPipeline;
use crate::config::Config;
use crate::onet::{OnetCatalog, TitleMatcher};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The full O*NET catalog, loaded once at startup and shared read-only.
    pub catalog: Arc<OnetCatalog>,
    pub matcher: TitleMatcher,
    pub pipeline: Arc<AnalysisPipeline>,
    pub config: Config,
}
