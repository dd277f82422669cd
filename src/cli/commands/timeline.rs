use super::Command;
use crate::config::FlowMetricsConfig;
use crate::jira;
use crate::metrics::MetricsReporter;
use crate::telemetry::{create_report_span, generate_correlation_id};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use tracing::Instrument;

pub struct TimelineCommand {
    pub input: PathBuf,
    pub issue: String,
    config: FlowMetricsConfig,
}

impl TimelineCommand {
    pub fn new(input: PathBuf, issue: String, config: FlowMetricsConfig) -> Self {
        Self { input, issue, config }
    }

    async fn build(&self) -> Result<String> {
        let issues = jira::load_issues(&self.input)
            .await
            .with_context(|| format!("Failed to read issues from {}", self.input.display()))?;
        let issue = issues
            .iter()
            .find(|issue| issue.key.eq_ignore_ascii_case(self.issue.trim()))
            .ok_or_else(|| anyhow!("Issue {} not found in {}", self.issue, self.input.display()))?;

        let analysis = self.config.analyzer().analyze(issue)?;
        Ok(MetricsReporter::format_timeline(&analysis))
    }
}

impl Command for TimelineCommand {
    async fn render(&self) -> Result<String> {
        let correlation_id = generate_correlation_id();
        let span = create_report_span("timeline", &self.input.to_string_lossy(), &correlation_id);

        self.build().instrument(span).await
    }
}
