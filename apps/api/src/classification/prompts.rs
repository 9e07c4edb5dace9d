//! Prompt templates for task classification.
//!
//! The framework text follows the ILO working paper on generative AI and
//! occupational exposure: three classification categories evaluated across six
//! task dimensions, with capability-level assumptions shifting the score
//! thresholds. Placeholders use `{name}` and are filled by
//! [`build_classification_prompt`].

use crate::onet::TaskStatement;

use super::CapabilityLevel;

/// System prompt for every classification call.
pub const CLASSIFIER_SYSTEM: &str = "You are a workforce analyst specializing in AI automation \
exposure assessment. Respond with a single valid JSON object and no other text.";

/// Threshold bands and scenario assumptions for one capability level.
pub struct LevelCriteria {
    pub name: &'static str,
    pub description: &'static str,
    pub ai_capability_growth: &'static str,
    pub reliability_threshold: &'static str,
    pub adoption_barriers: &'static str,
    pub human_oversight: &'static str,
    pub automate_band: &'static str,
    pub augment_band: &'static str,
    pub retain_band: &'static str,
}

pub const CONSERVATIVE_CRITERIA: LevelCriteria = LevelCriteria {
    name: "CONSERVATIVE",
    description: "Assumes AI capability stays close to what is demonstrated today. Only tasks \
that current tools already perform reliably in production settings are considered automatable.",
    ai_capability_growth: "Minimal improvement over the current frontier",
    reliability_threshold: "Requires proven, near-perfect reliability before automation",
    adoption_barriers: "Regulatory, trust, and integration barriers remain high",
    human_oversight: "Humans review nearly all AI output",
    automate_band: "score 80 or above",
    augment_band: "score 50-79",
    retain_band: "score below 50",
};

pub const MODERATE_CRITERIA: LevelCriteria = LevelCriteria {
    name: "MODERATE",
    description: "Assumes steady, incremental AI improvement over the next three to five years, \
consistent with the trajectory of recent model generations.",
    ai_capability_growth: "Steady improvement in reasoning, accuracy, and tool use",
    reliability_threshold: "Automation proceeds once quality matches a trained practitioner most \
of the time",
    adoption_barriers: "Workflow and compliance barriers are solved gradually",
    human_oversight: "Humans audit samples rather than every output",
    automate_band: "score 70 or above",
    augment_band: "score 40-69",
    retain_band: "score below 40",
};

pub const BOLD_CRITERIA: LevelCriteria = LevelCriteria {
    name: "BOLD",
    description: "Assumes rapid capability gains and aggressive adoption, with agentic systems \
handling multi-step work end to end.",
    ai_capability_growth: "Rapid gains including long-horizon agentic execution",
    reliability_threshold: "Automation proceeds at good-enough quality with fast feedback loops",
    adoption_barriers: "Organizations restructure work around AI quickly",
    human_oversight: "Humans set goals and handle exceptions only",
    automate_band: "score 60 or above",
    augment_band: "score 30-59",
    retain_band: "score below 30",
};

pub fn criteria_for(level: CapabilityLevel) -> &'static LevelCriteria {
    match level {
        CapabilityLevel::Conservative => &CONSERVATIVE_CRITERIA,
        CapabilityLevel::Moderate => &MODERATE_CRITERIA,
        CapabilityLevel::Bold => &BOLD_CRITERIA,
    }
}

const CLASSIFICATION_TEMPLATE: &str = r#"You are a workforce analyst specializing in AI automation exposure assessment. Your task is to classify job tasks based on their automation potential using a research-grounded framework from the International Labour Organization (ILO).

## CLASSIFICATION FRAMEWORK

You must classify each task into one of three categories:

### AUTOMATE ({automate_band})
Tasks where generative AI can perform the complete task with minimal human involvement. The technology executes the full workflow at acceptable quality and the human role reduces to occasional spot checks.

Characteristics:
- Structured inputs and outputs with clear success criteria
- Repetitive information processing or document handling
- Little direct interpersonal interaction
- Errors are cheap to detect and correct
- Established tools already demonstrate the capability

### AUGMENT ({augment_band})
Tasks where AI meaningfully improves speed or quality but a human stays in the loop. The technology drafts, suggests, or accelerates while the human directs the work, validates results, and holds responsibility.

Characteristics:
- Drafting, summarizing, or first-pass analysis that a human refines
- Requires context or judgment AI cannot fully supply
- Output quality varies and needs expert review
- Human accountability for the final result
- Hybrid workflows where AI handles volume and humans handle exceptions

### RETAIN ({retain_band})
Tasks that remain predominantly human because they depend on physical presence, interpersonal trust, accountability, or judgment that current and near-term AI cannot provide.

Characteristics:
- Physical embodiment, dexterity, or on-site presence
- Emotional support, persuasion, or relationship building
- High-stakes decisions with legal or ethical responsibility
- Novel situations with no established pattern to follow
- Trust in a named, accountable person is the product

## ASSESSMENT DIMENSIONS

Evaluate each task across these six dimensions:

**Task Structure**: How rule-bound and well-specified the task is.
- High automation: follows explicit procedures with defined inputs and outputs
- Low automation: open-ended work that requires framing the problem itself

**Cognitive vs Physical**: Where the work actually happens.
- High automation: pure information processing
- Low automation: requires physical presence, dexterity, or embodied skill

**Routine vs Novel**: How often the task repeats in recognizable form.
- High automation: recurs frequently with minor variation
- Low automation: each instance is substantially new

**Judgment Requirement**: How much discretionary interpretation the task needs.
- High automation: mechanical application of fixed criteria
- Low automation: weighing trade-offs, context, and precedent

**Interpersonal Intensity**: How central live human interaction is.
- High automation: little or no direct interaction
- Low automation: trust, persuasion, or emotional support is the work itself

**Stakes and Accountability**: The cost of an error and who answers for it.
- High automation: mistakes are cheap and reversible
- Low automation: errors carry legal, financial, or safety consequences borne by a named person

## CAPABILITY LEVEL: {level_name}

{level_description}

Assumptions:
- AI Capability Growth: {ai_capability_growth}
- Reliability Threshold: {reliability_threshold}
- Adoption Barriers: {adoption_barriers}
- Human Oversight: {human_oversight}

## SCORING METHODOLOGY

1. Start with a baseline score of 50
2. Apply dimension adjustments up or down based on the guidance above
3. Calculate a composite automation potential score (0-100)
4. Classify based on the capability level thresholds above
5. Provide clear reasoning connecting task characteristics to the classification

## OCCUPATION TO ANALYZE

**Job Title:** {job_title}

**Tasks to Classify:**

{task_list}

## SKILLS INFERENCE

After classifying all tasks, derive skill implications following the ILO framework guidance:

### Declining Skills (from AUTOMATE tasks)
- Identify 2-3 skills that will decline in value
- These should be directly tied to tasks you classified as AUTOMATE
- Focus on skills where AI can fully replace human execution
- Development priority: LOW (redirect energy elsewhere)

### Evolving Skills (from AUGMENT tasks)
- Identify 2-4 skills that must evolve from execution to oversight
- These should connect to AUGMENT-classified tasks
- Describe how the skill shifts from "doing" to "directing/validating"
- Development priority: HIGH (critical transition)

### Differentiating Skills (from RETAIN tasks)
- Identify 2-3 skills that increase in relative value
- These should connect to RETAIN-classified tasks
- Explain why these skills become competitive differentiators
- Development priority: HIGH (invest for differentiation)

CRITICAL: Connect each skill implication to specific task numbers you classified. Do not provide generic advice.

## OUTPUT FORMAT

Return ONLY a valid JSON object with this exact structure:

{
  "tasks": [
    {
      "taskNumber": 1,
      "task": "exact task text from input",
      "classification": "automate" | "augment" | "retain",
      "automationPotential": 85,
      "reasoning": "Explanation of why this classification was chosen, referencing specific dimensions",
      "aiCapabilities": ["capability 1", "capability 2"],
      "humanAdvantages": ["advantage 1", "advantage 2"]
    }
  ],
  "skills": [
    {
      "skillName": "Descriptive skill name",
      "currentRelevance": "increasing" | "stable" | "decreasing",
      "futureOutlook": "2-3 sentence description of how this skill will evolve in the AI era",
      "rationale": "Explanation connecting this skill implication to specific classified tasks by number",
      "developmentPriority": "high" | "medium" | "low",
      "adjacentSkills": ["related skill 1", "related skill 2"],
      "relatedTaskNumbers": [1, 5, 8]
    }
  ]
}

CRITICAL REQUIREMENTS:
- Return ONLY the JSON object, no additional text
- Include all {task_count} tasks in the output
- Include 6-8 skill implications (mix of declining, evolving, differentiating)
- Automation potential must be 0-100
- Classification must be exactly "automate", "augment", or "retain"
- Reasoning must reference specific dimensions and be 2-3 sentences minimum
- Each skill must reference specific task numbers that drive the implication
- currentRelevance must be exactly "increasing", "stable", or "decreasing"
- developmentPriority must be exactly "high", "medium", or "low""#;

/// Fills the classification template for one occupation's task set.
pub fn build_classification_prompt(
    tasks: &[TaskStatement],
    occupation_title: &str,
    level: CapabilityLevel,
) -> String {
    let criteria = criteria_for(level);
    let task_list = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, t.text))
        .collect::<Vec<_>>()
        .join("\n");

    CLASSIFICATION_TEMPLATE
        .replace("{automate_band}", criteria.automate_band)
        .replace("{augment_band}", criteria.augment_band)
        .replace("{retain_band}", criteria.retain_band)
        .replace("{level_name}", criteria.name)
        .replace("{level_description}", criteria.description)
        .replace("{ai_capability_growth}", criteria.ai_capability_growth)
        .replace("{reliability_threshold}", criteria.reliability_threshold)
        .replace("{adoption_barriers}", criteria.adoption_barriers)
        .replace("{human_oversight}", criteria.human_oversight)
        .replace("{job_title}", occupation_title)
        .replace("{task_list}", &task_list)
        .replace("{task_count}", &tasks.len().to_string())
}
