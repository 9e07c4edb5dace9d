//! Fuzzy job-title matching over the catalog's search index.
//!
//! Scoring is a rule cascade: exact match, prefix rules, substring, then a
//! token-overlap fallback. Every constant lives in [`ScoringConfig`] so the
//! tiers can be tuned without touching match logic. Matching is pure and
//! synchronous; the only input is the query string and the loaded index.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::{OccupationRecord, OnetCatalog};

/// Words carrying no signal for title matching.
const STOP_WORDS: &[&str] = &["the", "and", "for", "with", "a", "an", "of", "in", "to"];

/// Candidates retrieved internally when resolving a single best match.
const BEST_MATCH_CANDIDATES: usize = 5;

/// Runner-up candidates surfaced when confidence is below high.
const MAX_ALTERNATIVES: usize = 3;

/// Score tiers and thresholds for the title match cascade.
///
/// The tiers are ordered: `exact > title_prefix > query_prefix > substring`,
/// and the token-overlap fallback can never exceed `substring`
/// (`overlap_base + overlap_ratio_span + overlap_volume_bonus == substring`).
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Query equals the title.
    pub exact: f64,
    /// Title starts with the query.
    pub title_prefix: f64,
    /// Query starts with the title, title has at least `query_prefix_min_words`.
    pub query_prefix: f64,
    /// Minimum word count for the query-prefix rule. Guards short generic
    /// titles ("Chief") from swallowing longer queries.
    pub query_prefix_min_words: usize,
    /// Title contains the query as a substring.
    pub substring: f64,
    /// Weight of a prefix-relationship token match relative to an exact one.
    pub partial_match_weight: f64,
    /// Both tokens must be at least this long for a prefix-relationship match.
    pub partial_min_len: usize,
    /// Below this match ratio a multi-token query lands in the penalty band.
    pub weak_ratio_cutoff: f64,
    /// Penalty band: `penalty_base + ratio * penalty_span`.
    pub penalty_base: f64,
    pub penalty_span: f64,
    /// Overlap band: `overlap_base + ratio * overlap_ratio_span + volume bonus`.
    pub overlap_base: f64,
    pub overlap_ratio_span: f64,
    /// Bonus scaled by `min(total_matches / overlap_volume_scale, 1)`.
    pub overlap_volume_bonus: f64,
    pub overlap_volume_scale: f64,
    /// Scores at or above this are high confidence.
    pub high_confidence: f64,
    /// Scores at or above this (and below high) are medium confidence.
    pub medium_confidence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            exact: 100.0,
            title_prefix: 95.0,
            query_prefix: 90.0,
            query_prefix_min_words: 2,
            substring: 85.0,
            partial_match_weight: 0.7,
            partial_min_len: 4,
            weak_ratio_cutoff: 0.5,
            penalty_base: 20.0,
            penalty_span: 40.0,
            overlap_base: 50.0,
            overlap_ratio_span: 25.0,
            overlap_volume_bonus: 10.0,
            overlap_volume_scale: 3.0,
            high_confidence: 90.0,
            medium_confidence: 60.0,
        }
    }
}

/// How strongly a resolved occupation is believed to match the input title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchConfidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for MatchConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchConfidence::High => write!(f, "high"),
            MatchConfidence::Medium => write!(f, "medium"),
            MatchConfidence::Low => write!(f, "low"),
        }
    }
}

/// Which kind of index entry produced the winning match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Query equals a primary title.
    Exact,
    /// Matched a primary occupation title.
    Primary,
    /// Matched an alternate title.
    Alternate,
}

/// A scored search hit, ready for the autocomplete endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub title: String,
    pub code: String,
    pub is_primary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_title: Option<String>,
    pub score: f64,
}

/// A runner-up candidate attached to non-high-confidence matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeMatch {
    pub title: String,
    pub code: String,
    pub score: f64,
}

/// The resolved occupation for a free-text job title.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub occupation: OccupationRecord,
    pub matched_title: String,
    pub match_type: MatchType,
    pub confidence: MatchConfidence,
    pub score: f64,
    pub alternatives: Vec<AlternativeMatch>,
}

impl MatchResult {
    /// Human-readable explanation of how the title was resolved, shown to the
    /// user alongside the taxonomy result.
    pub fn reasoning(&self) -> String {
        match self.match_type {
            MatchType::Exact => format!("Exact match for \"{}\"", self.matched_title),
            MatchType::Primary => format!(
                "Matched occupation title \"{}\" with {} confidence",
                self.matched_title, self.confidence
            ),
            MatchType::Alternate => format!(
                "Matched \"{}\", an alternate title for {}, with {} confidence",
                self.matched_title, self.occupation.title, self.confidence
            ),
        }
    }
}

/// Matches free-text job titles against the catalog's search index.
#[derive(Clone)]
pub struct TitleMatcher {
    catalog: Arc<OnetCatalog>,
    config: ScoringConfig,
}

impl TitleMatcher {
    pub fn new(catalog: Arc<OnetCatalog>) -> Self {
        Self::with_config(catalog, ScoringConfig::default())
    }

    pub fn with_config(catalog: Arc<OnetCatalog>, config: ScoringConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &OnetCatalog {
        &self.catalog
    }

    /// Returns up to `limit` scored candidates for `query`, best first.
    /// Only titles whose occupation has task data are candidates; an
    /// occupation without tasks cannot be analyzed, so surfacing it would be a
    /// dead end. Ties break primary-first, then shorter title, then
    /// alphabetical, which keeps results deterministic for equal scores.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let query_lower = query.trim().to_lowercase();
        if query_lower.is_empty() {
            return Vec::new();
        }
        let query_tokens = tokenize(&query_lower);

        let mut hits: Vec<SearchHit> = self
            .catalog
            .search_entries()
            .iter()
            .filter(|entry| self.catalog.has_tasks(&entry.code))
            .filter_map(|entry| {
                self.score_title(&query_lower, &query_tokens, &entry.title)
                    .map(|score| SearchHit {
                        title: entry.title.clone(),
                        code: entry.code.clone(),
                        is_primary: entry.is_primary,
                        primary_title: entry.primary_title.clone(),
                        score,
                    })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.is_primary.cmp(&a.is_primary))
                .then_with(|| a.title.len().cmp(&b.title.len()))
                .then_with(|| a.title.cmp(&b.title))
        });
        hits.truncate(limit);
        hits
    }

    /// Resolves a job title to its single best occupation, or `None` when no
    /// index entry matches at all.
    pub fn find_best_match(&self, job_title: &str) -> Option<MatchResult> {
        let hits = self.search(job_title, BEST_MATCH_CANDIDATES);
        let top = hits.first()?;
        let occupation = self.catalog.occupation(&top.code)?.clone();

        let confidence = self.confidence_for(top.score);
        let query_lower = job_title.trim().to_lowercase();
        let match_type = if top.is_primary && top.title.to_lowercase() == query_lower {
            MatchType::Exact
        } else if top.is_primary {
            MatchType::Primary
        } else {
            MatchType::Alternate
        };

        let alternatives = if confidence == MatchConfidence::High {
            Vec::new()
        } else {
            hits.iter()
                .skip(1)
                .take(MAX_ALTERNATIVES)
                .map(|hit| AlternativeMatch {
                    title: hit.title.clone(),
                    code: hit.code.clone(),
                    score: hit.score,
                })
                .collect()
        };

        Some(MatchResult {
            matched_title: top.title.clone(),
            match_type,
            confidence,
            score: top.score,
            alternatives,
            occupation,
        })
    }

    fn confidence_for(&self, score: f64) -> MatchConfidence {
        if score >= self.config.high_confidence {
            MatchConfidence::High
        } else if score >= self.config.medium_confidence {
            MatchConfidence::Medium
        } else {
            MatchConfidence::Low
        }
    }

    /// Scores one title against the query, `None` when no rule matches.
    fn score_title(&self, query_lower: &str, query_tokens: &[String], title: &str) -> Option<f64> {
        let cfg = &self.config;
        let title_lower = title.to_lowercase();

        if title_lower == query_lower {
            return Some(cfg.exact);
        }
        if title_lower.starts_with(query_lower) {
            return Some(cfg.title_prefix);
        }
        if query_lower.starts_with(&title_lower)
            && title_lower.split_whitespace().count() >= cfg.query_prefix_min_words
        {
            return Some(cfg.query_prefix);
        }
        if title_lower.contains(query_lower) {
            return Some(cfg.substring);
        }

        if query_tokens.is_empty() {
            return None;
        }
        let title_tokens = tokenize(&title_lower);

        // Each query token counts once, at full weight for an exact word match
        // or partial weight for a prefix relationship. Bounded by 1 per token,
        // so the ratio never exceeds 1 and the band stays below `substring`.
        let mut total_matches = 0.0;
        for qt in query_tokens {
            if title_tokens.iter().any(|tt| tt == qt) {
                total_matches += 1.0;
            } else if title_tokens.iter().any(|tt| is_partial_match(qt, tt, cfg.partial_min_len)) {
                total_matches += cfg.partial_match_weight;
            }
        }
        if total_matches == 0.0 {
            return None;
        }

        let ratio = total_matches / query_tokens.len() as f64;
        if ratio < cfg.weak_ratio_cutoff && query_tokens.len() >= 2 {
            return Some(cfg.penalty_base + ratio * cfg.penalty_span);
        }
        let volume = (total_matches / cfg.overlap_volume_scale).min(1.0);
        Some(cfg.overlap_base + ratio * cfg.overlap_ratio_span + volume * cfg.overlap_volume_bonus)
    }
}

/// Lowercased word tokens with stop words and single characters removed.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|word| word.len() > 1 && !STOP_WORDS.contains(word))
        .map(|word| word.to_string())
        .collect()
}

/// Prefix relationship in either direction, both sides long enough to carry
/// signal ("develop"/"developer" yes, "ma"/"manager" no).
fn is_partial_match(a: &str, b: &str, min_len: usize) -> bool {
    a.len() >= min_len && b.len() >= min_len && (a.starts_with(b) || b.starts_with(a))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
