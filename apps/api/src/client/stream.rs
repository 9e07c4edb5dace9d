//! SSE consumer for the streaming analysis endpoint.
//!
//! [`StreamingAnalysisClient`] drives one analysis at a time in a background
//! task and folds every event into a shared [`StreamingAnalysisState`]
//! snapshot. Callers poll [`state`](StreamingAnalysisClient::state) instead
//! of awaiting; starting a new analysis aborts the previous one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{abortable, AbortHandle};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::analysis::{AnalyzeRequest, StreamEvent};

use super::reducer::{StreamStatus, StreamingAnalysisState};

// ────────────────────────────────────────────────────────────────────────────
// Frame decoding
// ────────────────────────────────────────────────────────────────────────────

/// Incremental decoder for an SSE byte stream.
///
/// Frames are separated by a blank line; each frame may carry several `data:`
/// lines (joined with a newline per the SSE spec) along with comment and
/// field lines, which are dropped. Keep-alive comments therefore decode to
/// nothing. The buffer holds raw bytes and only completed frames are decoded
/// as text, so a multi-byte character split across network chunks reassembles
/// intact. Framing is LF-based; a trailing CR on a line is tolerated.
#[derive(Debug, Default)]
pub struct SseFrameDecoder {
    buffer: Vec<u8>,
}

impl SseFrameDecoder {
    /// Feeds one chunk and returns the data payloads of every frame it
    /// completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut payloads = Vec::new();
        while let Some(pos) = find_frame_end(&self.buffer) {
            let frame_bytes: Vec<u8> = self.buffer.drain(..pos + 2).collect();
            let frame = String::from_utf8_lossy(&frame_bytes);
            let mut data_lines: Vec<&str> = Vec::new();
            for line in frame.lines() {
                let line = line.strip_suffix('\r').unwrap_or(line);
                if let Some(rest) = line.strip_prefix("data:") {
                    data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
                }
            }
            if !data_lines.is_empty() {
                payloads.push(data_lines.join("\n"));
            }
        }
        payloads
    }
}

/// The frame boundary is ASCII, which no multi-byte UTF-8 sequence contains.
fn find_frame_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|window| window == b"\n\n")
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

struct RunningAnalysis {
    abort: AbortHandle,
    handle: JoinHandle<()>,
}

/// Poll-style client over the streaming endpoint.
pub struct StreamingAnalysisClient {
    http: reqwest::Client,
    base_url: String,
    state: Arc<Mutex<StreamingAnalysisState>>,
    current: Option<RunningAnalysis>,
}

impl StreamingAnalysisClient {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            state: Arc::new(Mutex::new(StreamingAnalysisState::default())),
            current: None,
        }
    }

    /// Starts a new analysis, aborting any run still in flight. The state
    /// snapshot resets to connecting immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn analyze(&mut self, request: AnalyzeRequest) {
        self.abort_current();
        // The abort only lands at the old task's next poll, so it can still
        // be mid-write here. Each run gets its own snapshot; a late write
        // from the previous run hits the abandoned one.
        self.state = Arc::new(Mutex::new(StreamingAnalysisState::connecting()));

        let url = format!("{}/api/v1/analyze/stream", self.base_url);
        let http = self.http.clone();
        let shared = self.state.clone();
        let (run, abort) = abortable(consume_stream(http, url, request, shared));
        let handle = tokio::spawn(async move {
            // Err means aborted, which is an intentional cancel.
            let _ = run.await;
        });
        self.current = Some(RunningAnalysis { abort, handle });
    }

    /// Aborts the in-flight run, if any, and returns the state to idle with a
    /// cancellation note. Does nothing when no run is active.
    pub fn cancel(&mut self) {
        if self.abort_current() {
            self.state = Arc::new(Mutex::new(StreamingAnalysisState {
                error: Some("Analysis cancelled".to_string()),
                ..StreamingAnalysisState::default()
            }));
        }
    }

    /// Aborts any in-flight run and restores the initial idle state.
    pub fn reset(&mut self) {
        self.abort_current();
        self.state = Arc::new(Mutex::new(StreamingAnalysisState::default()));
    }

    /// Current snapshot of the analysis state.
    pub fn state(&self) -> StreamingAnalysisState {
        lock(&self.state).clone()
    }

    /// True once the background task has exited (or none was started).
    pub fn finished(&self) -> bool {
        self.current
            .as_ref()
            .map_or(true, |run| run.handle.is_finished())
    }

    fn abort_current(&mut self) -> bool {
        match self.current.take() {
            Some(run) => {
                run.abort.abort();
                true
            }
            None => false,
        }
    }
}

fn lock(state: &Arc<Mutex<StreamingAnalysisState>>) -> MutexGuard<'_, StreamingAnalysisState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn fail(state: &Arc<Mutex<StreamingAnalysisState>>, message: String) {
    let mut guard = lock(state);
    guard.status = StreamStatus::Error;
    guard.error = Some(message);
}

/// Runs one streaming request to completion, folding events into `state`.
/// Malformed events are logged and dropped; the stream keeps going.
async fn consume_stream(
    http: reqwest::Client,
    url: String,
    request: AnalyzeRequest,
    state: Arc<Mutex<StreamingAnalysisState>>,
) {
    let response = match http.post(&url).json(&request).send().await {
        Ok(response) => response,
        Err(err) => {
            fail(&state, format!("Connection error: {err}"));
            return;
        }
    };
    if !response.status().is_success() {
        fail(&state, format!("HTTP error: {}", response.status()));
        return;
    }

    let mut decoder = SseFrameDecoder::default();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                fail(&state, format!("Stream error: {err}"));
                return;
            }
        };
        for payload in decoder.push(&chunk) {
            match serde_json::from_str::<StreamEvent>(&payload) {
                Ok(event) => {
                    let terminal = {
                        let mut guard = lock(&state);
                        guard.apply(&event);
                        guard.is_terminal()
                    };
                    if terminal {
                        return;
                    }
                }
                Err(err) => warn!("Dropping malformed stream event: {err}"),
            }
        }
    }

    // The server closed the stream without a terminal event.
    let mut guard = lock(&state);
    if !guard.is_terminal() {
        guard.status = StreamStatus::Error;
        guard.error = Some("Stream ended unexpectedly".to_string());
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
