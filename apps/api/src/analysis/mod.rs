//! The analysis pipeline: taxonomy resolution, task retrieval, LLM
//! classification, and the progressive event protocol that reports each
//! stage.

pub mod events;
pub mod handlers;
pub mod orchestrator;
pub mod query_log;

pub use events::{
    AutomationExposure, ClassificationData, CompleteData, ErrorData, EventPayload, PendingTask,
    SkillImplication, StreamEvent, TasksPendingData, TaxonomyResolution,
};
pub use orchestrator::{
    AnalysisError, AnalysisPipeline, AnalyzeRequest, ChannelSink, EventSink, JobAnalysis,
    MethodologyNote, NullSink, MAX_TASKS_PER_ANALYSIS,
};
