//! Analysis orchestration — one state machine from free-text job title to
//! classified task set.
//!
//! The pipeline is transport-neutral: callers plug in an [`EventSink`] (a
//! channel feeding an SSE response, or [`NullSink`] for the plain JSON
//! endpoint) and the same stage sequencing, error mapping, and query logging
//! applies to both. Exactly one terminal event is emitted per run unless the
//! sink's consumer disappears first.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::classification::{CapabilityLevel, ClassifiedTask, ClassifyError, TaskClassifier};
use crate::onet::{OnetCatalog, TitleMatcher};

use super::events::{
    AutomationExposure, ClassificationData, CompleteData, ErrorData, EventPayload,
    SkillImplication, StreamEvent, TasksPendingData, TaxonomyResolution,
};
use super::query_log;

/// Hard cap on tasks sent to the classifier per analysis.
pub const MAX_TASKS_PER_ANALYSIS: usize = 25;

// ────────────────────────────────────────────────────────────────────────────
// Request / result types
// ────────────────────────────────────────────────────────────────────────────

/// Incoming analysis request. Fields are optional so that validation produces
/// pipeline errors (and error events on the stream) instead of transport-level
/// rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub capability_level: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(job_title: &str, capability_level: CapabilityLevel) -> Self {
        Self {
            job_title: Some(job_title.to_string()),
            capability_level: Some(capability_level.as_str().to_string()),
        }
    }

    /// Checks presence and enum membership. An absent capability level
    /// defaults to moderate; a present but unknown one is rejected.
    fn validate(&self) -> Result<(String, CapabilityLevel), AnalysisError> {
        let title = self.job_title.as_deref().map(str::trim).unwrap_or("");
        if title.is_empty() {
            return Err(AnalysisError::InvalidRequest(
                "Job title is required".to_string(),
            ));
        }
        let level = match self.capability_level.as_deref() {
            None | Some("") => CapabilityLevel::default(),
            Some(raw) => raw.parse().map_err(|_| {
                AnalysisError::InvalidRequest("Invalid capability level".to_string())
            })?,
        };
        Ok((title.to_string(), level))
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("No O*NET occupation found matching \"{0}\"")]
    NoOccupation(String),

    #[error("No task data available for \"{0}\"")]
    NoTasks(String),

    #[error(transparent)]
    Gateway(#[from] ClassifyError),

    /// The event consumer went away mid-run. No terminal event is emitted
    /// since nobody is listening.
    #[error("analysis cancelled: event receiver dropped")]
    Cancelled,
}

/// Progress carried by the error event for each failure kind. Failures before
/// taxonomy resolution report 0; missing task data reports the taxonomy
/// stage's progress since that event already went out.
fn error_progress(error: &AnalysisError) -> u8 {
    match error {
        AnalysisError::NoTasks(_) => 10,
        _ => 0,
    }
}

/// The complete analysis, as returned by the non-streaming endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysis {
    pub id: String,
    pub job_title: String,
    pub taxonomy_resolution: TaxonomyResolution,
    pub tasks: Vec<ClassifiedTask>,
    pub automation_exposure: AutomationExposure,
    pub skill_implications: Vec<SkillImplication>,
    pub methodology: Vec<MethodologyNote>,
    pub capability_level: CapabilityLevel,
    /// YYYY-MM-DD.
    pub analysis_date: String,
}

/// One step in the methodology disclosure attached to every analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodologyNote {
    pub step: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limitations: Option<String>,
}

fn build_methodology(level: CapabilityLevel) -> Vec<MethodologyNote> {
    vec![
        MethodologyNote {
            step: "1".to_string(),
            title: "Taxonomy Resolution".to_string(),
            description: "The input title is matched against O*NET primary and alternate \
                occupation titles using a deterministic scoring cascade."
                .to_string(),
            data_source: Some("O*NET 30.1 database (U.S. Department of Labor)".to_string()),
            limitations: Some(
                "Titles far outside the taxonomy resolve to the closest match or not at all."
                    .to_string(),
            ),
        },
        MethodologyNote {
            step: "2".to_string(),
            title: "Task Retrieval".to_string(),
            description: format!(
                "Task statements for the resolved occupation are loaded from the O*NET task \
                 database; the first {MAX_TASKS_PER_ANALYSIS} are analyzed."
            ),
            data_source: Some("O*NET task statements".to_string()),
            limitations: Some(
                "Occupations vary in how completely their tasks are cataloged.".to_string(),
            ),
        },
        MethodologyNote {
            step: "3".to_string(),
            title: "Task Classification".to_string(),
            description: format!(
                "Each task is classified as automate, augment, or retain with an automation \
                 potential score, using an ILO-derived assessment framework under the {level} \
                 capability scenario."
            ),
            data_source: Some("Claude (Anthropic Messages API)".to_string()),
            limitations: Some("Model judgments are estimates, not measurements.".to_string()),
        },
        MethodologyNote {
            step: "4".to_string(),
            title: "Aggregation".to_string(),
            description: "Task classifications are aggregated into exposure percentages and an \
                overall score; skill implications are derived from the classified tasks."
                .to_string(),
            data_source: None,
            limitations: None,
        },
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Event sinks
// ────────────────────────────────────────────────────────────────────────────

/// Receives events as the pipeline progresses. `emit` returns false once the
/// consumer is gone, which stops the run.
#[async_trait]
pub trait EventSink: Send {
    async fn emit(&mut self, event: StreamEvent) -> bool;
}

/// Forwards events into a bounded channel feeding an SSE response.
pub struct ChannelSink {
    tx: mpsc::Sender<StreamEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<StreamEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&mut self, event: StreamEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }
}

/// Swallows events, for callers that only want the final result.
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn emit(&mut self, _event: StreamEvent) -> bool {
        true
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Resolves, retrieves, classifies, and aggregates one analysis at a time.
/// Stateless between runs; requests never queue behind each other.
pub struct AnalysisPipeline {
    catalog: Arc<OnetCatalog>,
    matcher: TitleMatcher,
    classifier: Arc<dyn TaskClassifier>,
}

impl AnalysisPipeline {
    pub fn new(catalog: Arc<OnetCatalog>, classifier: Arc<dyn TaskClassifier>) -> Self {
        Self {
            matcher: TitleMatcher::new(catalog.clone()),
            catalog,
            classifier,
        }
    }

    /// Runs one analysis end to end, emitting progress events into `sink`.
    pub async fn run(
        &self,
        request: &AnalyzeRequest,
        sink: &mut dyn EventSink,
    ) -> Result<JobAnalysis, AnalysisError> {
        let started = Instant::now();

        match self.run_stages(request, sink, started).await {
            Ok(analysis) => Ok(analysis),
            Err(AnalysisError::Cancelled) => {
                debug!("Analysis consumer went away; stopping without terminal event");
                Err(AnalysisError::Cancelled)
            }
            Err(error) => {
                let log_title = request.job_title.as_deref().unwrap_or("unknown");
                let log_level = request
                    .capability_level
                    .as_deref()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default();
                query_log::failure(log_title, log_level, started.elapsed(), &error.to_string());

                let event = StreamEvent::new(
                    EventPayload::Error(ErrorData {
                        message: error.to_string(),
                    }),
                    error_progress(&error),
                );
                sink.emit(event).await;
                Err(error)
            }
        }
    }

    async fn run_stages(
        &self,
        request: &AnalyzeRequest,
        sink: &mut dyn EventSink,
        started: Instant,
    ) -> Result<JobAnalysis, AnalysisError> {
        let (job_title, level) = request.validate()?;

        // Stage 1: taxonomy resolution. Pure in-memory matching, immediate.
        let best = self
            .matcher
            .find_best_match(&job_title)
            .ok_or_else(|| AnalysisError::NoOccupation(job_title.clone()))?;
        let taxonomy = TaxonomyResolution::from_match(&job_title, &best);
        info!(
            "Resolved \"{}\" to {} ({}) with {} confidence",
            job_title, best.occupation.title, best.occupation.code, best.confidence
        );
        self.emit(sink, EventPayload::Taxonomy(taxonomy.clone()), 10)
            .await?;

        // Stage 2: task retrieval, bounded for cost and latency.
        let all_tasks = self.catalog.tasks(&best.occupation.code);
        if all_tasks.is_empty() {
            return Err(AnalysisError::NoTasks(best.occupation.title.clone()));
        }
        let tasks = &all_tasks[..all_tasks.len().min(MAX_TASKS_PER_ANALYSIS)];
        self.emit(
            sink,
            EventPayload::TasksPending(TasksPendingData::from_statements(tasks)),
            15,
        )
        .await?;

        // Stage 3: classification. The long wait; no timeout and no retry,
        // failures surface immediately.
        let outcome = self
            .classifier
            .classify(tasks, &best.occupation.title, level)
            .await?;

        let automation_exposure = AutomationExposure::from(outcome.summary);
        let skill_implications: Vec<SkillImplication> = outcome
            .skills
            .iter()
            .enumerate()
            .map(|(i, s)| SkillImplication::from_inference(i, s))
            .collect();
        self.emit(
            sink,
            EventPayload::Classification(ClassificationData {
                tasks: outcome.tasks.clone(),
                automation_exposure: automation_exposure.clone(),
                skill_implications: skill_implications.clone(),
            }),
            95,
        )
        .await?;

        query_log::success(&job_title, &best, level, started.elapsed(), outcome.tasks.len());

        // Stage 4: completion.
        let analysis_date = Utc::now().format("%Y-%m-%d").to_string();
        self.emit(
            sink,
            EventPayload::Complete(CompleteData {
                analysis_date: analysis_date.clone(),
                total_time_ms: started.elapsed().as_millis() as u64,
            }),
            100,
        )
        .await?;

        Ok(JobAnalysis {
            id: Uuid::new_v4().to_string(),
            job_title,
            taxonomy_resolution: taxonomy,
            tasks: outcome.tasks,
            automation_exposure,
            skill_implications,
            methodology: build_methodology(level),
            capability_level: level,
            analysis_date,
        })
    }

    async fn emit(
        &self,
        sink: &mut dyn EventSink,
        payload: EventPayload,
        progress: u8,
    ) -> Result<(), AnalysisError> {
        if sink.emit(StreamEvent::new(payload, progress)).await {
            Ok(())
        } else {
            Err(AnalysisError::Cancelled)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::classification::{
        summarize, ClassificationOutcome, DevelopmentPriority, SkillInference, SkillRelevance,
        TaskClassification,
    };
    use crate::onet::{OccupationRecord, SearchEntry, TaskStatement};

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<StreamEvent>,
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn emit(&mut self, event: StreamEvent) -> bool {
            self.events.push(event);
            true
        }
    }

    /// Simulates a consumer that disconnected before the run started.
    struct ClosedSink;

    #[async_trait]
    impl EventSink for ClosedSink {
        async fn emit(&mut self, _event: StreamEvent) -> bool {
            false
        }
    }

    /// Classifies every task deterministically without any network access.
    struct StubClassifier;

    #[async_trait]
    impl TaskClassifier for StubClassifier {
        async fn classify(
            &self,
            tasks: &[TaskStatement],
            _occupation_title: &str,
            _level: CapabilityLevel,
        ) -> Result<ClassificationOutcome, ClassifyError> {
            let classified: Vec<ClassifiedTask> = tasks
                .iter()
                .enumerate()
                .map(|(i, t)| ClassifiedTask {
                    id: t.id.clone(),
                    name: format!("Task {}", i + 1),
                    description: t.text.clone(),
                    classification: match i % 3 {
                        0 => TaskClassification::Automate,
                        1 => TaskClassification::Augment,
                        _ => TaskClassification::Retain,
                    },
                    automation_potential: 60,
                    reasoning: "stubbed".to_string(),
                    ai_capabilities: vec![],
                    human_advantages: vec![],
                })
                .collect();
            let summary = summarize(&classified);
            Ok(ClassificationOutcome {
                tasks: classified,
                skills: vec![
                    SkillInference {
                        skill_name: "Code review".to_string(),
                        current_relevance: SkillRelevance::Increasing,
                        future_outlook: "Grows".to_string(),
                        rationale: "From task 1".to_string(),
                        development_priority: DevelopmentPriority::High,
                        adjacent_skills: vec![],
                        related_tasks: vec![],
                    },
                    SkillInference {
                        skill_name: "Manual testing".to_string(),
                        current_relevance: SkillRelevance::Decreasing,
                        future_outlook: "Shrinks".to_string(),
                        rationale: "From task 2".to_string(),
                        development_priority: DevelopmentPriority::Low,
                        adjacent_skills: vec![],
                        related_tasks: vec![],
                    },
                ],
                summary,
            })
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl TaskClassifier for FailingClassifier {
        async fn classify(
            &self,
            _tasks: &[TaskStatement],
            _occupation_title: &str,
            _level: CapabilityLevel,
        ) -> Result<ClassificationOutcome, ClassifyError> {
            Err(ClassifyError::InvalidResponse("boom".to_string()))
        }
    }

    fn pipeline_with(task_count: usize, classifier: Arc<dyn TaskClassifier>) -> AnalysisPipeline {
        let code = "15-1252.00";
        let occupations = HashMap::from([(
            code.to_string(),
            OccupationRecord {
                code: code.to_string(),
                title: "Software Developers".to_string(),
                description: "Develop software".to_string(),
                alternate_titles: (1..=6).map(|i| format!("Alt Title {i}")).collect(),
            },
        )]);
        let tasks: Vec<TaskStatement> = (1..=task_count)
            .map(|i| TaskStatement {
                id: format!("t{i}"),
                text: format!("Task text {i}"),
                task_type: "Core".to_string(),
                date: "07/2014".to_string(),
                source: None,
            })
            .collect();
        let index = vec![SearchEntry {
            title: "Software Developers".to_string(),
            code: code.to_string(),
            is_primary: true,
            primary_title: None,
        }];
        let catalog = OnetCatalog::from_parts(
            occupations,
            HashMap::from([(code.to_string(), tasks)]),
            index,
        )
        .unwrap();
        AnalysisPipeline::new(Arc::new(catalog), classifier)
    }

    fn fixture(task_count: usize) -> AnalysisPipeline {
        pipeline_with(task_count, Arc::new(StubClassifier))
    }

    fn request(title: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            job_title: Some(title.to_string()),
            capability_level: Some("moderate".to_string()),
        }
    }

    fn kinds(events: &[StreamEvent]) -> Vec<&'static str> {
        events
            .iter()
            .map(|e| match e.payload {
                EventPayload::Taxonomy(_) => "taxonomy",
                EventPayload::TasksPending(_) => "tasks_pending",
                EventPayload::Classification(_) => "classification",
                EventPayload::Complete(_) => "complete",
                EventPayload::Error(_) => "error",
            })
            .collect()
    }

    #[tokio::test]
    async fn test_successful_run_emits_exact_sequence() {
        let pipeline = fixture(3);
        let mut sink = RecordingSink::default();

        let analysis = pipeline
            .run(&request("Software Developers"), &mut sink)
            .await
            .unwrap();

        assert_eq!(
            kinds(&sink.events),
            vec!["taxonomy", "tasks_pending", "classification", "complete"]
        );
        let progress: Vec<u8> = sink.events.iter().map(|e| e.progress).collect();
        assert_eq!(progress, vec![10, 15, 95, 100]);
        assert!(sink
            .events
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(sink.events.last().unwrap().is_terminal());

        assert_eq!(analysis.job_title, "Software Developers");
        assert_eq!(analysis.taxonomy_resolution.onet_code, "15-1252.00");
        assert_eq!(analysis.tasks.len(), 3);
        assert_eq!(analysis.capability_level, CapabilityLevel::Moderate);
        assert_eq!(analysis.methodology.len(), 4);
    }

    #[tokio::test]
    async fn test_taxonomy_event_contents() {
        let pipeline = fixture(2);
        let mut sink = RecordingSink::default();
        pipeline
            .run(&request("Software Developers"), &mut sink)
            .await
            .unwrap();

        let EventPayload::Taxonomy(taxonomy) = &sink.events[0].payload else {
            panic!("first event must be taxonomy");
        };
        assert_eq!(taxonomy.input_title, "Software Developers");
        assert_eq!(taxonomy.resolved_title, "Software Developers");
        assert_eq!(taxonomy.onet_code, "15-1252.00");
        // The occupation has 6 alternates; the event caps at 5.
        assert_eq!(taxonomy.alternative_titles.len(), 5);
        assert!(!taxonomy.match_reasoning.is_empty());
    }

    #[tokio::test]
    async fn test_missing_title_emits_single_error_event() {
        let pipeline = fixture(2);
        let mut sink = RecordingSink::default();

        let err = pipeline
            .run(&AnalyzeRequest::default(), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidRequest(_)));
        assert_eq!(kinds(&sink.events), vec!["error"]);
        assert_eq!(sink.events[0].progress, 0);
        let EventPayload::Error(data) = &sink.events[0].payload else {
            panic!();
        };
        assert_eq!(data.message, "Job title is required");
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let pipeline = fixture(2);
        let mut sink = RecordingSink::default();
        let req = AnalyzeRequest {
            job_title: Some("   ".to_string()),
            capability_level: None,
        };
        let err = pipeline.run(&req, &mut sink).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_invalid_capability_level_rejected() {
        let pipeline = fixture(2);
        let mut sink = RecordingSink::default();
        let req = AnalyzeRequest {
            job_title: Some("Software Developers".to_string()),
            capability_level: Some("reckless".to_string()),
        };

        let err = pipeline.run(&req, &mut sink).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid capability level");
        assert_eq!(kinds(&sink.events), vec!["error"]);
    }

    #[tokio::test]
    async fn test_absent_capability_level_defaults_to_moderate() {
        let pipeline = fixture(2);
        let mut sink = RecordingSink::default();
        let req = AnalyzeRequest {
            job_title: Some("Software Developers".to_string()),
            capability_level: None,
        };
        let analysis = pipeline.run(&req, &mut sink).await.unwrap();
        assert_eq!(analysis.capability_level, CapabilityLevel::Moderate);
    }

    #[tokio::test]
    async fn test_unmatched_title_emits_not_found_error() {
        let pipeline = fixture(2);
        let mut sink = RecordingSink::default();

        let err = pipeline
            .run(&request("Quantum Basket Weaver"), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::NoOccupation(_)));
        assert_eq!(kinds(&sink.events), vec!["error"]);
        assert_eq!(sink.events[0].progress, 0);
        let EventPayload::Error(data) = &sink.events[0].payload else {
            panic!();
        };
        assert_eq!(
            data.message,
            "No O*NET occupation found matching \"Quantum Basket Weaver\""
        );
    }

    #[tokio::test]
    async fn test_forty_tasks_truncate_to_twenty_five_with_matching_ids() {
        let pipeline = fixture(40);
        let mut sink = RecordingSink::default();

        let analysis = pipeline
            .run(&request("Software Developers"), &mut sink)
            .await
            .unwrap();

        let EventPayload::TasksPending(pending) = &sink.events[1].payload else {
            panic!("second event must be tasks_pending");
        };
        assert_eq!(pending.task_count, 25);
        assert_eq!(pending.tasks.len(), 25);

        let EventPayload::Classification(classification) = &sink.events[2].payload else {
            panic!("third event must be classification");
        };
        assert_eq!(classification.tasks.len(), 25);

        let pending_ids: Vec<&str> = pending.tasks.iter().map(|t| t.id.as_str()).collect();
        let classified_ids: Vec<&str> =
            classification.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(pending_ids, classified_ids);
        assert_eq!(analysis.tasks.len(), 25);
    }

    #[tokio::test]
    async fn test_gateway_failure_short_circuits_after_tasks_pending() {
        let pipeline = pipeline_with(3, Arc::new(FailingClassifier));
        let mut sink = RecordingSink::default();

        let err = pipeline
            .run(&request("Software Developers"), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Gateway(_)));
        assert_eq!(kinds(&sink.events), vec!["taxonomy", "tasks_pending", "error"]);
        let last = sink.events.last().unwrap();
        assert_eq!(last.progress, 0);
        let EventPayload::Error(data) = &last.payload else {
            panic!();
        };
        assert_eq!(
            data.message,
            "Failed to parse classification response: boom"
        );
    }

    #[tokio::test]
    async fn test_closed_sink_cancels_without_terminal_event() {
        let pipeline = fixture(3);
        let mut sink = ClosedSink;

        let err = pipeline
            .run(&request("Software Developers"), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Cancelled));
    }

    #[tokio::test]
    async fn test_classification_event_payload() {
        let pipeline = fixture(3);
        let mut sink = RecordingSink::default();
        pipeline
            .run(&request("Software Developers"), &mut sink)
            .await
            .unwrap();

        let EventPayload::Classification(data) = &sink.events[2].payload else {
            panic!();
        };
        // 1 automate, 1 augment, 1 retain from the stub cycle.
        assert_eq!(data.automation_exposure.exposure.automate_percentage, 33);
        assert_eq!(data.automation_exposure.exposure.retain_percentage, 34);
        assert!(data
            .automation_exposure
            .summary
            .starts_with("This role has"));
        let skill_ids: Vec<&str> = data.skill_implications.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(skill_ids, vec!["skill-1", "skill-2"]);
    }

    #[tokio::test]
    async fn test_complete_event_reports_date_and_elapsed() {
        let pipeline = fixture(2);
        let mut sink = RecordingSink::default();
        let analysis = pipeline
            .run(&request("Software Developers"), &mut sink)
            .await
            .unwrap();

        let EventPayload::Complete(data) = &sink.events[3].payload else {
            panic!();
        };
        assert_eq!(data.analysis_date, analysis.analysis_date);
        assert_eq!(data.analysis_date.len(), 10);
        assert_eq!(&data.analysis_date[4..5], "-");
        assert_eq!(sink.events[3].progress, 100);
    }

    #[test]
    fn test_error_progress_mapping() {
        assert_eq!(
            error_progress(&AnalysisError::InvalidRequest("x".to_string())),
            0
        );
        assert_eq!(
            error_progress(&AnalysisError::NoOccupation("x".to_string())),
            0
        );
        assert_eq!(error_progress(&AnalysisError::NoTasks("x".to_string())), 10);
        assert_eq!(
            error_progress(&AnalysisError::Gateway(ClassifyError::InvalidResponse(
                "x".to_string()
            ))),
            0
        );
    }

    #[tokio::test]
    async fn test_null_sink_still_produces_full_analysis() {
        let pipeline = fixture(3);
        let analysis = pipeline
            .run(&request("Software Developers"), &mut NullSink)
            .await
            .unwrap();

        assert!(!analysis.id.is_empty());
        assert_eq!(analysis.tasks.len(), 3);
        assert_eq!(analysis.skill_implications.len(), 2);
        assert_eq!(analysis.automation_exposure.exposure.overall_exposure_score, 60);
    }
}
