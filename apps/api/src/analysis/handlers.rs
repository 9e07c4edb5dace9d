//! HTTP handlers for the analysis endpoints, synchronous and streaming.

use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::Stream;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

use super::orchestrator::{AnalysisError, AnalyzeRequest, ChannelSink, JobAnalysis, NullSink};

/// Wire envelope for the non-streaming endpoint. Failures never reach this
/// type; they are mapped through [`AppError`] instead.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub data: JobAnalysis,
}

/// POST /api/v1/analyze
///
/// Runs the full pipeline and returns the complete analysis in one response.
/// Progress events are discarded.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let analysis = state.pipeline.run(&request, &mut NullSink).await?;
    Ok(Json(AnalyzeResponse {
        success: true,
        data: analysis,
    }))
}

/// POST /api/v1/analyze/stream
///
/// Streams analysis progress as server-sent events. The pipeline runs in its
/// own task; when the client disconnects the receiver drops and the run stops
/// at its next emit. Errors are delivered as terminal `error` events on the
/// stream itself, so this handler always responds 200.
pub async fn handle_analyze_stream(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let (tx, rx) = mpsc::channel(16);
    let pipeline = state.pipeline.clone();

    tokio::spawn(async move {
        let mut sink = ChannelSink::new(tx);
        match pipeline.run(&request, &mut sink).await {
            // Disconnects are routine; the pipeline already logs them at debug.
            Ok(_) | Err(AnalysisError::Cancelled) => {}
            Err(error) => {
                // The terminal error event is already on the stream; this line
                // is for the server log only.
                warn!("Streaming analysis ended with error: {error}");
            }
        }
    });

    let stream = ReceiverStream::new(rx).map(|event| Event::default().json_data(&event));

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
