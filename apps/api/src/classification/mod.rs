//! Task classification — the LLM gateway and everything that validates it.
//!
//! One call classifies an occupation's task set into automate/augment/retain,
//! scores automation potential, and infers skill implications. The raw model
//! output crosses exactly one validation boundary here: after
//! [`parse_classification`] the data is either fully populated and typed or
//! the call has failed. Nothing partially valid flows downstream.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{strip_json_fences, LlmClient, LlmError};
use crate::onet::TaskStatement;

pub mod prompts;

use prompts::{build_classification_prompt, CLASSIFIER_SYSTEM};

// ────────────────────────────────────────────────────────────────────────────
// Domain types
// ────────────────────────────────────────────────────────────────────────────

/// Scenario of AI capability growth the classification assumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityLevel {
    Conservative,
    #[default]
    Moderate,
    Bold,
}

impl CapabilityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityLevel::Conservative => "conservative",
            CapabilityLevel::Moderate => "moderate",
            CapabilityLevel::Bold => "bold",
        }
    }
}

impl fmt::Display for CapabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conservative" => Ok(CapabilityLevel::Conservative),
            "moderate" => Ok(CapabilityLevel::Moderate),
            "bold" => Ok(CapabilityLevel::Bold),
            other => Err(format!("invalid capability level: {other}")),
        }
    }
}

/// The three-way exposure category for a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskClassification {
    Automate,
    Augment,
    Retain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillRelevance {
    Increasing,
    Stable,
    Decreasing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevelopmentPriority {
    High,
    Medium,
    Low,
}

/// One task with its classification, fully normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedTask {
    /// Inherited from the source task statement.
    pub id: String,
    /// Positional display name ("Task 1", "Task 2", ...).
    pub name: String,
    pub description: String,
    pub classification: TaskClassification,
    /// 0-100 composite score.
    pub automation_potential: u8,
    pub reasoning: String,
    #[serde(default)]
    pub ai_capabilities: Vec<String>,
    #[serde(default)]
    pub human_advantages: Vec<String>,
}

/// One inferred skill implication, tied back to the tasks that drive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInference {
    pub skill_name: String,
    pub current_relevance: SkillRelevance,
    pub future_outlook: String,
    pub rationale: String,
    pub development_priority: DevelopmentPriority,
    #[serde(default)]
    pub adjacent_skills: Vec<String>,
    /// Task ids (not numbers) that drive this implication.
    #[serde(default)]
    pub related_tasks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExposureCategory {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl fmt::Display for ExposureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExposureCategory::Low => write!(f, "low"),
            ExposureCategory::Moderate => write!(f, "moderate"),
            ExposureCategory::High => write!(f, "high"),
            ExposureCategory::VeryHigh => write!(f, "very-high"),
        }
    }
}

/// Aggregate exposure statistics over one classified task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureSummary {
    pub automate_percentage: u8,
    pub augment_percentage: u8,
    pub retain_percentage: u8,
    /// Rounded mean of the task automation potentials.
    pub overall_exposure_score: u8,
    pub exposure_category: ExposureCategory,
}

impl Default for ExposureSummary {
    fn default() -> Self {
        Self {
            automate_percentage: 0,
            augment_percentage: 0,
            retain_percentage: 0,
            overall_exposure_score: 0,
            exposure_category: ExposureCategory::Low,
        }
    }
}

/// Everything one classification call produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationOutcome {
    pub tasks: Vec<ClassifiedTask>,
    pub skills: Vec<SkillInference>,
    pub summary: ExposureSummary,
}

impl ClassificationOutcome {
    pub fn empty() -> Self {
        Self {
            tasks: Vec::new(),
            skills: Vec::new(),
            summary: ExposureSummary::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Failed to parse classification response: {0}")]
    InvalidResponse(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Classifier seam
// ────────────────────────────────────────────────────────────────────────────

/// Classifies an occupation's tasks. The trait seam keeps the analysis
/// pipeline testable without network access.
#[async_trait]
pub trait TaskClassifier: Send + Sync {
    async fn classify(
        &self,
        tasks: &[TaskStatement],
        occupation_title: &str,
        level: CapabilityLevel,
    ) -> Result<ClassificationOutcome, ClassifyError>;
}

/// Production classifier backed by the Claude API.
pub struct LlmTaskClassifier {
    llm: LlmClient,
}

impl LlmTaskClassifier {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TaskClassifier for LlmTaskClassifier {
    async fn classify(
        &self,
        tasks: &[TaskStatement],
        occupation_title: &str,
        level: CapabilityLevel,
    ) -> Result<ClassificationOutcome, ClassifyError> {
        if tasks.is_empty() {
            return Ok(ClassificationOutcome::empty());
        }

        let prompt = build_classification_prompt(tasks, occupation_title, level);
        info!(
            "Classifying {} tasks for \"{}\" at {} level with {}",
            tasks.len(),
            occupation_title,
            level,
            self.llm.model()
        );

        let response = self.llm.call(&prompt, CLASSIFIER_SYSTEM).await?;
        if response.truncated() {
            warn!("Classification response hit the output token cap and may be incomplete");
        }
        let text = response.text().ok_or(LlmError::EmptyContent)?;

        let (classified, skills) = parse_classification(text, tasks)?;
        let summary = summarize(&classified);

        Ok(ClassificationOutcome {
            tasks: classified,
            skills,
            summary,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response normalization
// ────────────────────────────────────────────────────────────────────────────

/// Model output before normalization. Unknown fields are ignored; every field
/// the model might omit is optional here and defaulted or rejected below.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClassification {
    tasks: Option<Vec<RawTask>>,
    skills: Option<Vec<RawSkill>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTask {
    task: Option<String>,
    classification: Option<TaskClassification>,
    automation_potential: Option<f64>,
    reasoning: Option<String>,
    ai_capabilities: Option<Vec<String>>,
    human_advantages: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSkill {
    skill_name: Option<String>,
    current_relevance: Option<SkillRelevance>,
    future_outlook: Option<String>,
    rationale: Option<String>,
    development_priority: Option<DevelopmentPriority>,
    adjacent_skills: Option<Vec<String>>,
    related_task_numbers: Option<Vec<i64>>,
}

/// Parses and normalizes a raw model response against the tasks that were
/// sent. Produces fully populated results or fails the whole call.
fn parse_classification(
    response_text: &str,
    source_tasks: &[TaskStatement],
) -> Result<(Vec<ClassifiedTask>, Vec<SkillInference>), ClassifyError> {
    let text = strip_json_fences(response_text);
    let json = extract_json_object(text)
        .ok_or_else(|| ClassifyError::InvalidResponse("no JSON found in response".to_string()))?;

    let raw: RawClassification = serde_json::from_str(json)
        .map_err(|e| ClassifyError::InvalidResponse(e.to_string()))?;

    let raw_tasks = raw.tasks.ok_or_else(|| {
        ClassifyError::InvalidResponse("invalid response structure: missing tasks array".to_string())
    })?;
    if raw_tasks.len() != source_tasks.len() {
        return Err(ClassifyError::InvalidResponse(format!(
            "expected {} task classifications, got {}",
            source_tasks.len(),
            raw_tasks.len()
        )));
    }

    let tasks = raw_tasks
        .into_iter()
        .zip(source_tasks)
        .enumerate()
        .map(|(index, (raw, source))| normalize_task(index, raw, source))
        .collect::<Result<Vec<_>, _>>()?;

    let skills = match raw.skills {
        Some(raw_skills) => raw_skills
            .into_iter()
            .map(|s| normalize_skill(s, &tasks))
            .collect(),
        None => {
            warn!("No skills found in classification response");
            Vec::new()
        }
    };

    Ok((tasks, skills))
}

fn normalize_task(
    index: usize,
    raw: RawTask,
    source: &TaskStatement,
) -> Result<ClassifiedTask, ClassifyError> {
    let classification = raw.classification.ok_or_else(|| {
        ClassifyError::InvalidResponse(format!("task {} is missing a classification", index + 1))
    })?;

    Ok(ClassifiedTask {
        id: source.id.clone(),
        name: format!("Task {}", index + 1),
        description: raw.task.unwrap_or_else(|| source.text.clone()),
        classification,
        automation_potential: raw.automation_potential.unwrap_or(0.0).clamp(0.0, 100.0).round()
            as u8,
        reasoning: raw
            .reasoning
            .unwrap_or_else(|| "No reasoning provided".to_string()),
        ai_capabilities: raw.ai_capabilities.unwrap_or_default(),
        human_advantages: raw.human_advantages.unwrap_or_default(),
    })
}

fn normalize_skill(raw: RawSkill, tasks: &[ClassifiedTask]) -> SkillInference {
    SkillInference {
        skill_name: raw.skill_name.unwrap_or_else(|| "Unnamed skill".to_string()),
        current_relevance: raw.current_relevance.unwrap_or(SkillRelevance::Stable),
        future_outlook: raw
            .future_outlook
            .unwrap_or_else(|| "No outlook provided".to_string()),
        rationale: raw
            .rationale
            .unwrap_or_else(|| "No rationale provided".to_string()),
        development_priority: raw
            .development_priority
            .unwrap_or(DevelopmentPriority::Medium),
        adjacent_skills: raw.adjacent_skills.unwrap_or_default(),
        related_tasks: raw
            .related_task_numbers
            .unwrap_or_default()
            .into_iter()
            .filter(|n| *n >= 1 && *n <= tasks.len() as i64)
            .map(|n| tasks[(n - 1) as usize].id.clone())
            .collect(),
    }
}

/// First `{` through last `}`, covering wrapper prose around the JSON body.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}

// ────────────────────────────────────────────────────────────────────────────
// Summary statistics
// ────────────────────────────────────────────────────────────────────────────

/// Aggregates a classified task set into exposure percentages and an overall
/// score. Retain absorbs the rounding slack so the three percentages always
/// sum to 100.
pub fn summarize(tasks: &[ClassifiedTask]) -> ExposureSummary {
    let total = tasks.len();
    if total == 0 {
        return ExposureSummary::default();
    }

    let automate = tasks
        .iter()
        .filter(|t| t.classification == TaskClassification::Automate)
        .count();
    let augment = tasks
        .iter()
        .filter(|t| t.classification == TaskClassification::Augment)
        .count();
    let score_sum: u32 = tasks.iter().map(|t| t.automation_potential as u32).sum();

    let automate_percentage = percentage(automate, total);
    let augment_percentage = percentage(augment, total).min(100 - automate_percentage);
    let retain_percentage = 100 - automate_percentage - augment_percentage;

    let overall_exposure_score = (score_sum as f64 / total as f64).round() as u8;
    let exposure_category = if overall_exposure_score < 30 {
        ExposureCategory::Low
    } else if overall_exposure_score < 50 {
        ExposureCategory::Moderate
    } else if overall_exposure_score < 70 {
        ExposureCategory::High
    } else {
        ExposureCategory::VeryHigh
    };

    ExposureSummary {
        automate_percentage,
        augment_percentage,
        retain_percentage,
        overall_exposure_score,
        exposure_category,
    }
}

fn percentage(count: usize, total: usize) -> u8 {
    ((count as f64 / total as f64) * 100.0).round() as u8
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
