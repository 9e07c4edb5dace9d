//! Streaming protocol types for progressive analysis delivery.
//!
//! One analysis emits an append-only event sequence. A successful run is
//! exactly `taxonomy, tasks_pending, classification, complete`; any failure
//! replaces the remainder of the sequence with a single `error`. After a
//! terminal event (`complete` or `error`) nothing further is emitted.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::classification::{ClassifiedTask, ExposureSummary, SkillInference};
use crate::onet::{MatchConfidence, MatchResult, TaskStatement};

/// One frame on the wire: a typed payload plus timestamp and coarse progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    #[serde(flatten)]
    pub payload: EventPayload,
    /// Milliseconds since the epoch, non-decreasing within one stream.
    pub timestamp: i64,
    /// 0-100, non-decreasing within one stream.
    pub progress: u8,
}

impl StreamEvent {
    pub fn new(payload: EventPayload, progress: u8) -> Self {
        Self {
            payload,
            timestamp: Utc::now().timestamp_millis(),
            progress,
        }
    }

    /// Terminal events end the stream; nothing may follow one.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.payload,
            EventPayload::Complete(_) | EventPayload::Error(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    Taxonomy(TaxonomyResolution),
    TasksPending(TasksPendingData),
    Classification(ClassificationData),
    Complete(CompleteData),
    Error(ErrorData),
}

/// How the input title was resolved against the occupation taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyResolution {
    pub input_title: String,
    pub resolved_title: String,
    pub onet_code: String,
    pub confidence: MatchConfidence,
    /// Up to the first five alternate titles of the resolved occupation.
    pub alternative_titles: Vec<String>,
    pub match_reasoning: String,
}

impl TaxonomyResolution {
    pub fn from_match(input_title: &str, best: &MatchResult) -> Self {
        Self {
            input_title: input_title.to_string(),
            resolved_title: best.occupation.title.clone(),
            onet_code: best.occupation.code.clone(),
            confidence: best.confidence,
            alternative_titles: best
                .occupation
                .alternate_titles
                .iter()
                .take(5)
                .cloned()
                .collect(),
            match_reasoning: best.reasoning(),
        }
    }
}

/// The bounded task set about to be classified, for skeleton rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksPendingData {
    pub task_count: usize,
    pub tasks: Vec<PendingTask>,
}

impl TasksPendingData {
    /// Ids are inherited from the source statements so the later
    /// classification event lines up with this list one-to-one.
    pub fn from_statements(statements: &[TaskStatement]) -> Self {
        Self {
            task_count: statements.len(),
            tasks: statements
                .iter()
                .map(|t| PendingTask {
                    id: t.id.clone(),
                    description: t.text.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTask {
    pub id: String,
    pub description: String,
}

/// Full classification results, sent in a single frame once the gateway
/// returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationData {
    pub tasks: Vec<ClassifiedTask>,
    pub automation_exposure: AutomationExposure,
    pub skill_implications: Vec<SkillImplication>,
}

/// Exposure summary plus the one-line sentence shown in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationExposure {
    #[serde(flatten)]
    pub exposure: ExposureSummary,
    pub summary: String,
}

impl From<ExposureSummary> for AutomationExposure {
    fn from(exposure: ExposureSummary) -> Self {
        Self {
            summary: format!(
                "This role has {} automation exposure.",
                exposure.exposure_category
            ),
            exposure,
        }
    }
}

/// A skill inference with a stable display id, minus the internal task links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillImplication {
    pub id: String,
    pub skill_name: String,
    pub current_relevance: crate::classification::SkillRelevance,
    pub future_outlook: String,
    pub rationale: String,
    pub development_priority: crate::classification::DevelopmentPriority,
    pub adjacent_skills: Vec<String>,
}

impl SkillImplication {
    pub fn from_inference(index: usize, inference: &SkillInference) -> Self {
        Self {
            id: format!("skill-{}", index + 1),
            skill_name: inference.skill_name.clone(),
            current_relevance: inference.current_relevance,
            future_outlook: inference.future_outlook.clone(),
            rationale: inference.rationale.clone(),
            development_priority: inference.development_priority,
            adjacent_skills: inference.adjacent_skills.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteData {
    /// YYYY-MM-DD.
    pub analysis_date: String,
    pub total_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::ExposureCategory;

    #[test]
    fn test_event_wire_shape() {
        let event = StreamEvent {
            payload: EventPayload::Error(ErrorData {
                message: "Job title is required".to_string(),
            }),
            timestamp: 1700000000000,
            progress: 0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["data"]["message"], "Job title is required");
        assert_eq!(json["timestamp"], 1700000000000i64);
        assert_eq!(json["progress"], 0);
    }

    #[test]
    fn test_tasks_pending_uses_snake_case_tag() {
        let event = StreamEvent::new(
            EventPayload::TasksPending(TasksPendingData {
                task_count: 0,
                tasks: vec![],
            }),
            15,
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "tasks_pending");
        assert_eq!(json["data"]["taskCount"], 0);
    }

    #[test]
    fn test_event_round_trips_through_json() {
        let event = StreamEvent::new(
            EventPayload::Complete(CompleteData {
                analysis_date: "2026-08-25".to_string(),
                total_time_ms: 1234,
            }),
            100,
        );
        let json = serde_json::to_string(&event).unwrap();
        let back: StreamEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert!(back.is_terminal());
    }

    #[test]
    fn test_automation_exposure_summary_line() {
        let exposure = AutomationExposure::from(ExposureSummary {
            automate_percentage: 40,
            augment_percentage: 40,
            retain_percentage: 20,
            overall_exposure_score: 72,
            exposure_category: ExposureCategory::VeryHigh,
        });
        assert_eq!(exposure.summary, "This role has very-high automation exposure.");

        let json = serde_json::to_value(&exposure).unwrap();
        // Flattened summary fields sit beside the sentence.
        assert_eq!(json["automatePercentage"], 40);
        assert_eq!(json["exposureCategory"], "very-high");
        assert_eq!(json["summary"], "This role has very-high automation exposure.");
    }

    #[test]
    fn test_pending_tasks_inherit_source_ids() {
        let statements = vec![
            crate::onet::TaskStatement {
                id: "8823".to_string(),
                text: "Review claims".to_string(),
                task_type: "Core".to_string(),
                date: "07/2014".to_string(),
                source: None,
            },
            crate::onet::TaskStatement {
                id: "8824".to_string(),
                text: "File reports".to_string(),
                task_type: "Core".to_string(),
                date: "07/2014".to_string(),
                source: None,
            },
        ];
        let pending = TasksPendingData::from_statements(&statements);
        assert_eq!(pending.task_count, 2);
        let ids: Vec<&str> = pending.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["8823", "8824"]);
    }
}
