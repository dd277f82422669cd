use crate::config::FlowMetricsConfig;
use crate::jira;
use crate::metrics::{IssueAnalysis, IssueAnalyzer};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub mod cycle_time;
pub mod release_failure;
pub mod status_durations;
pub mod throughput;
pub mod timeline;

pub use cycle_time::CycleTimeCommand;
pub use release_failure::ReleaseFailureCommand;
pub use status_durations::StatusDurationsCommand;
pub use throughput::ThroughputCommand;
pub use timeline::TimelineCommand;

#[allow(async_fn_in_trait)]
pub trait Command {
    /// Build the command output without printing it.
    async fn render(&self) -> Result<String>;

    async fn execute(&self) -> Result<()> {
        let output = self.render().await?;
        println!("{}", output.trim_end());
        Ok(())
    }
}

/// Load the export at `input` and analyze every issue in it.
pub async fn analyze_input(
    input: &Path,
    config: &FlowMetricsConfig,
) -> Result<(IssueAnalyzer, Vec<IssueAnalysis>)> {
    let issues = jira::load_issues(input)
        .await
        .with_context(|| format!("Failed to read issues from {}", input.display()))?;
    info!(issues = issues.len(), "Loaded issues");

    let analyzer = config.analyzer();
    let analyses = analyzer.analyze_all(&issues)?;

    let skipped: usize = analyses.iter().map(|a| a.log.skipped_records()).sum();
    if skipped > 0 {
        info!(skipped, "Skipped malformed history records");
    }

    Ok((analyzer, analyses))
}
