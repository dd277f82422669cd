use super::{analyze_input, Command};
use crate::config::FlowMetricsConfig;
use crate::metrics::{release_failure_report, MetricsReporter};
use crate::telemetry::{create_report_span, generate_correlation_id};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, Instrument};

pub struct ReleaseFailureCommand {
    pub input: PathBuf,
    pub exempt: Vec<String>,
    pub json: bool,
    config: FlowMetricsConfig,
}

impl ReleaseFailureCommand {
    pub fn new(input: PathBuf, config: FlowMetricsConfig) -> Self {
        Self {
            input,
            exempt: Vec::new(),
            json: false,
            config,
        }
    }

    pub fn with_exempt(mut self, exempt: Vec<String>) -> Self {
        self.exempt = exempt;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    async fn build(&self) -> Result<String> {
        let (_, analyses) = analyze_input(&self.input, &self.config).await?;
        let report = release_failure_report(&analyses, &self.exempt);
        info!(
            releases = report.total_releases,
            failed = report.total_failed,
            "Release failure report ready"
        );

        if self.json {
            Ok(MetricsReporter::export_json(&report)?)
        } else {
            Ok(MetricsReporter::format_release_failure_report(&report))
        }
    }
}

impl Command for ReleaseFailureCommand {
    async fn render(&self) -> Result<String> {
        let correlation_id = generate_correlation_id();
        let span = create_report_span("release-failure", &self.input.to_string_lossy(), &correlation_id);

        self.build().instrument(span).await
    }
}
