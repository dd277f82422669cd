use super::{analyze_input, Command};
use crate::config::FlowMetricsConfig;
use crate::metrics::{throughput_report, MetricsReporter};
use crate::telemetry::{create_report_span, generate_correlation_id};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, Instrument};

pub struct ThroughputCommand {
    pub input: PathBuf,
    pub team: Option<String>,
    pub json: bool,
    config: FlowMetricsConfig,
}

impl ThroughputCommand {
    pub fn new(input: PathBuf, config: FlowMetricsConfig) -> Self {
        Self {
            input,
            team: None,
            json: false,
            config,
        }
    }

    pub fn with_team(mut self, team: Option<String>) -> Self {
        self.team = team;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    async fn build(&self) -> Result<String> {
        let (_, analyses) = analyze_input(&self.input, &self.config).await?;
        let report = throughput_report(&analyses, self.team.as_deref());
        info!(
            months = report.months.len(),
            fell_back_to_done = report.fell_back_to_done,
            "Throughput report ready"
        );

        if self.json {
            Ok(MetricsReporter::export_json(&report)?)
        } else {
            Ok(MetricsReporter::format_throughput_report(&report))
        }
    }
}

impl Command for ThroughputCommand {
    async fn render(&self) -> Result<String> {
        let correlation_id = generate_correlation_id();
        let span = create_report_span("throughput", &self.input.to_string_lossy(), &correlation_id);

        self.build().instrument(span).await
    }
}
