use super::{analyze_input, Command};
use crate::config::FlowMetricsConfig;
use crate::metrics::{cycle_time_report, MetricsReporter};
use crate::telemetry::{create_report_span, generate_correlation_id};
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{info, Instrument};

pub struct CycleTimeCommand {
    pub input: PathBuf,
    pub window_start: Option<NaiveDate>,
    pub detailed: bool,
    pub json: bool,
    config: FlowMetricsConfig,
}

impl CycleTimeCommand {
    pub fn new(input: PathBuf, config: FlowMetricsConfig) -> Self {
        Self {
            input,
            window_start: None,
            detailed: false,
            json: false,
            config,
        }
    }

    pub fn with_window_start(mut self, window_start: Option<NaiveDate>) -> Self {
        self.window_start = window_start;
        self
    }

    pub fn with_detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    async fn build(&self) -> Result<String> {
        let window_start = self
            .window_start
            .map(|date| self.config.window_start(date))
            .transpose()?;
        let (analyzer, analyses) = analyze_input(&self.input, &self.config).await?;
        let report = cycle_time_report(&analyses, window_start, analyzer.calendar())?;

        info!(
            measured = report.entries.len(),
            excluded_before_window = report.excluded_before_window,
            missing_timestamps = report.missing_timestamps,
            "Cycle time report ready"
        );

        if self.json {
            Ok(MetricsReporter::export_json(&report)?)
        } else {
            Ok(MetricsReporter::format_cycle_time_report(&report, self.detailed))
        }
    }
}

impl Command for CycleTimeCommand {
    async fn render(&self) -> Result<String> {
        let correlation_id = generate_correlation_id();
        let span = create_report_span("cycle_time", &self.input.to_string_lossy(), &correlation_id);

        self.build().instrument(span).await
    }
}
