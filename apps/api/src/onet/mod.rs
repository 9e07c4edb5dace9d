//! O*NET taxonomy: catalog data, fuzzy title matching, and the search endpoint.

pub mod catalog;
pub mod handlers;
pub mod matcher;

pub use catalog::{CatalogStats, OccupationRecord, OnetCatalog, SearchEntry, TaskStatement};
pub use matcher::{
    AlternativeMatch, MatchConfidence, MatchResult, MatchType, ScoringConfig, TitleMatcher,
};
