use super::{analyze_input, Command};
use crate::config::FlowMetricsConfig;
use crate::metrics::{status_duration_report, MetricsReporter};
use crate::telemetry::{create_report_span, generate_correlation_id};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, Instrument};

pub struct StatusDurationsCommand {
    pub input: PathBuf,
    pub statuses: Vec<String>,
    pub json: bool,
    config: FlowMetricsConfig,
}

impl StatusDurationsCommand {
    pub fn new(input: PathBuf, config: FlowMetricsConfig) -> Self {
        Self {
            input,
            statuses: Vec::new(),
            json: false,
            config,
        }
    }

    pub fn with_statuses(mut self, statuses: Vec<String>) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    async fn build(&self) -> Result<String> {
        let (analyzer, analyses) = analyze_input(&self.input, &self.config).await?;
        let report = status_duration_report(&analyses, &self.statuses, analyzer.calendar());
        info!(issues = report.issues.len(), "Status duration report ready");

        if self.json {
            Ok(MetricsReporter::export_json(&report)?)
        } else {
            Ok(MetricsReporter::format_status_duration_report(&report))
        }
    }
}

impl Command for StatusDurationsCommand {
    async fn render(&self) -> Result<String> {
        let correlation_id = generate_correlation_id();
        let span = create_report_span("status_durations", &self.input.to_string_lossy(), &correlation_id);

        self.build().instrument(span).await
    }
}
