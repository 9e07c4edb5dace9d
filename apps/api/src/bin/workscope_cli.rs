//! Command-line consumer for the streaming analysis endpoint.
//!
//! Drives the same client code a UI would: submits one analysis, prints
//! progress as events fold into the shared state snapshot, and renders the
//! classified results when the stream completes.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use clap::Parser;

use workscope::analysis::AnalyzeRequest;
use workscope::classification::{CapabilityLevel, TaskClassification};
use workscope::client::{StreamStatus, StreamingAnalysisClient};

#[derive(Parser, Debug)]
#[command(
    name = "workscope",
    about = "Analyze a job title's automation exposure"
)]
struct Args {
    /// Job title to analyze
    job_title: String,

    /// AI capability scenario: conservative, moderate, or bold
    #[arg(long, default_value = "moderate")]
    capability_level: String,

    /// Server to talk to
    #[arg(long, default_value = "http://localhost:8080")]
    server: String,

    /// Give up after this many seconds
    #[arg(long, default_value_t = 180)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let level: CapabilityLevel = args
        .capability_level
        .parse()
        .map_err(|e: String| anyhow!(e))?;

    let mut client = StreamingAnalysisClient::new(&args.server);
    client.analyze(AnalyzeRequest::new(&args.job_title, level));

    let deadline = tokio::time::Instant::now() + Duration::from_secs(args.timeout);
    let mut printed_taxonomy = false;
    let mut printed_pending = false;
    let mut last_progress = 0u8;

    let final_state = loop {
        let state = client.state();

        if !printed_taxonomy {
            if let Some(taxonomy) = &state.taxonomy {
                println!(
                    "Matched: {} ({})",
                    taxonomy.resolved_title, taxonomy.onet_code
                );
                println!("  {}", taxonomy.match_reasoning);
                printed_taxonomy = true;
            }
        }
        if !printed_pending && !state.pending_tasks.is_empty() {
            println!("Classifying {} tasks...", state.pending_tasks.len());
            printed_pending = true;
        }
        if state.progress != last_progress {
            println!("Progress: {}%", state.progress);
            last_progress = state.progress;
        }

        if state.is_terminal() {
            break state;
        }
        if tokio::time::Instant::now() >= deadline {
            client.cancel();
            bail!("Timed out after {}s", args.timeout);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    };

    if final_state.status == StreamStatus::Error {
        bail!(final_state
            .error
            .unwrap_or_else(|| "analysis failed".to_string()));
    }

    let exposure = final_state
        .automation_exposure
        .ok_or_else(|| anyhow!("stream completed without classification data"))?;
    println!();
    println!("{}", exposure.summary);
    println!(
        "  automate {}% / augment {}% / retain {}%  (overall {}/100)",
        exposure.exposure.automate_percentage,
        exposure.exposure.augment_percentage,
        exposure.exposure.retain_percentage,
        exposure.exposure.overall_exposure_score
    );

    println!();
    println!("Tasks:");
    for task in &final_state.tasks {
        println!(
            "  [{:>8}] {:>3}%  {}",
            label(task.classification),
            task.automation_potential,
            task.description
        );
    }

    if !final_state.skill_implications.is_empty() {
        println!();
        println!("Skill implications:");
        for skill in &final_state.skill_implications {
            println!("  - {}: {}", skill.skill_name, skill.future_outlook);
        }
    }

    if let (Some(date), Some(ms)) = (final_state.analysis_date, final_state.total_time_ms) {
        println!();
        println!("Completed {date} in {ms}ms");
    }
    Ok(())
}

fn label(classification: TaskClassification) -> &'static str {
    match classification {
        TaskClassification::Automate => "automate",
        TaskClassification::Augment => "augment",
        TaskClassification::Retain => "retain",
    }
}
