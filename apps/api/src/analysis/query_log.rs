//! Structured query logging over analysis traffic.
//!
//! Every completed or failed analysis is recorded as one structured tracing
//! event under the `query_log` target, so a subscriber can route them into a
//! separate file or sink without touching application logs. Entries carry a
//! fresh id so log lines can be correlated downstream.

use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use crate::classification::CapabilityLevel;
use crate::onet::MatchResult;

pub fn success(
    job_title: &str,
    best: &MatchResult,
    level: CapabilityLevel,
    elapsed: Duration,
    task_count: usize,
) {
    info!(
        target: "query_log",
        id = %Uuid::new_v4(),
        job_title,
        onet_code = %best.occupation.code,
        matched_title = %best.matched_title,
        match_confidence = %best.confidence,
        capability_level = %level,
        response_time_ms = elapsed.as_millis() as u64,
        task_count,
        "analysis completed"
    );
}

pub fn failure(job_title: &str, level: CapabilityLevel, elapsed: Duration, error: &str) {
    info!(
        target: "query_log",
        id = %Uuid::new_v4(),
        job_title,
        capability_level = %level,
        response_time_ms = elapsed.as_millis() as u64,
        error,
        "analysis failed"
    );
}
