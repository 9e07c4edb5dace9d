use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use workscope::analysis::AnalysisPipeline;
use workscope::classification::LlmTaskClassifier;
use workscope::config::Config;
use workscope::llm_client::LlmClient;
use workscope::onet::{OnetCatalog, TitleMatcher};
use workscope::routes::build_router;
use workscope::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Workscope API v{}", env!("CARGO_PKG_VERSION"));

    // Load the processed O*NET catalog into memory
    let catalog = Arc::new(OnetCatalog::load(Path::new(&config.data_dir))?);

    // Initialize LLM client. A missing key is not fatal: search and health
    // work without it, analysis calls report it when attempted.
    if config.anthropic_api_key.is_empty() {
        warn!("ANTHROPIC_API_KEY is not set; analysis requests will fail until it is provided");
    }
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_model.clone(),
    );
    info!("LLM client initialized (model: {})", llm.model());

    // Build the analysis pipeline
    let classifier = Arc::new(LlmTaskClassifier::new(llm));
    let matcher = TitleMatcher::new(catalog.clone());
    let pipeline = Arc::new(AnalysisPipeline::new(catalog.clone(), classifier));

    // Build app state
    let state = AppState {
        catalog,
        matcher,
        pipeline,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
