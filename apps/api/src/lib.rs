//! Workforce intelligence over the O*NET occupation taxonomy.
//!
//! Resolves free-text job titles to O*NET occupations, retrieves their task
//! statements, classifies each task's automation exposure through the
//! Anthropic Messages API, and streams progress as server-sent events.

pub mod analysis;
pub mod classification;
pub mod client;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod onet;
pub mod routes;
pub mod state;
