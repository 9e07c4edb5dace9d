//! Pure state reducer over the streaming event protocol.
//!
//! Every event folds into a [`StreamingAnalysisState`] snapshot that a UI can
//! render directly. The fold is deterministic and replay-safe: applying the
//! same event sequence twice lands on the same state.

use crate::analysis::events::{EventPayload, StreamEvent};
use crate::analysis::{AutomationExposure, PendingTask, SkillImplication, TaxonomyResolution};
use crate::classification::ClassifiedTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamStatus {
    #[default]
    Idle,
    Connecting,
    Streaming,
    Complete,
    Error,
}

/// Everything a consumer needs to render one analysis in progress.
///
/// The pending and classified task views are mutually exclusive: the
/// classification event replaces the pending skeleton with the full results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamingAnalysisState {
    pub status: StreamStatus,
    pub progress: u8,
    pub taxonomy: Option<TaxonomyResolution>,
    pub pending_tasks: Vec<PendingTask>,
    pub tasks: Vec<ClassifiedTask>,
    pub automation_exposure: Option<AutomationExposure>,
    pub skill_implications: Vec<SkillImplication>,
    pub analysis_date: Option<String>,
    pub total_time_ms: Option<u64>,
    pub error: Option<String>,
}

impl StreamingAnalysisState {
    /// Fresh state for a request that has been sent but not yet answered.
    pub fn connecting() -> Self {
        Self {
            status: StreamStatus::Connecting,
            ..Self::default()
        }
    }

    /// Folds one event into the state.
    ///
    /// Progress never moves backwards, and `complete` pins it to 100. Each
    /// taxonomy event sets the resolution; nothing clears it short of
    /// [`reset`](Self::reset). Error events leave progress alone so the bar
    /// freezes where the failure happened.
    pub fn apply(&mut self, event: &StreamEvent) {
        match &event.payload {
            EventPayload::Taxonomy(data) => {
                self.status = StreamStatus::Streaming;
                self.taxonomy = Some(data.clone());
                self.progress = self.progress.max(event.progress);
            }
            EventPayload::TasksPending(data) => {
                self.status = StreamStatus::Streaming;
                self.pending_tasks = data.tasks.clone();
                self.progress = self.progress.max(event.progress);
            }
            EventPayload::Classification(data) => {
                self.status = StreamStatus::Streaming;
                self.tasks = data.tasks.clone();
                self.automation_exposure = Some(data.automation_exposure.clone());
                self.skill_implications = data.skill_implications.clone();
                // The pending skeleton is fully superseded by classified tasks.
                self.pending_tasks.clear();
                self.progress = self.progress.max(event.progress);
            }
            EventPayload::Complete(data) => {
                self.status = StreamStatus::Complete;
                self.analysis_date = Some(data.analysis_date.clone());
                self.total_time_ms = Some(data.total_time_ms);
                self.progress = 100;
            }
            EventPayload::Error(data) => {
                self.status = StreamStatus::Error;
                self.error = Some(data.message.clone());
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, StreamStatus::Complete | StreamStatus::Error)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
