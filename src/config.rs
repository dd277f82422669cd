use crate::calendar::BusinessCalendar;
use crate::history::{default_labels, TrackedLabel};
use crate::jira::TeamResolver;
use crate::metrics::{IssueAnalyzer, DEFAULT_TRACKED_STATUSES};
use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for flow-metrics
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlowMetricsConfig {
    /// Working weekdays and hours counted per day
    pub calendar: BusinessCalendar,
    /// Semantic labels extracted from each history
    pub labels: Vec<TrackedLabel>,
    /// Statuses measured by the status-durations report
    pub tracked_statuses: Vec<String>,
    /// Jira payload settings
    pub jira: JiraConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JiraConfig {
    /// Custom field holding the owning team (e.g. `customfield_10075`)
    pub team_field: Option<String>,
    /// Custom field holding story points
    pub story_points_field: Option<String>,
    /// IANA zone used to localize `--window-start` dates
    pub window_timezone: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for FlowMetricsConfig {
    fn default() -> Self {
        Self {
            calendar: BusinessCalendar::default(),
            labels: default_labels(),
            tracked_statuses: DEFAULT_TRACKED_STATUSES.iter().map(|s| s.to_string()).collect(),
            jira: JiraConfig {
                team_field: None,
                story_points_field: None,
                window_timezone: "America/Los_Angeles".to_string(),
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
        }
    }
}

impl FlowMetricsConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (flow-metrics.toml, .flow-metrics-rc)
    /// 3. Environment variables (e.g. FLOW_METRICS_CALENDAR__HOURS_PER_DAY)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Same as [`FlowMetricsConfig::load`], looking for files under `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        let toml_path = dir.join("flow-metrics.toml");
        if toml_path.exists() {
            builder = builder.add_source(File::from(toml_path));
        }

        let rc_path = dir.join(".flow-metrics-rc");
        if rc_path.exists() {
            builder = builder.add_source(File::from(rc_path).format(config::FileFormat::Toml));
        }

        // Override with environment variables
        builder = builder.add_source(
            Environment::with_prefix("FLOW_METRICS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let flow_metrics_config: FlowMetricsConfig = builder.build()?.try_deserialize()?;
        flow_metrics_config.validate()?;

        Ok(flow_metrics_config)
    }

    pub fn validate(&self) -> Result<()> {
        self.calendar.validate()?;
        self.window_timezone()?;
        if self.labels.iter().any(|label| label.statuses.is_empty()) {
            return Err(anyhow!("every tracked label needs at least one status"));
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    pub fn team_resolver(&self) -> TeamResolver {
        TeamResolver::from_env(self.jira.team_field.clone())
    }

    pub fn analyzer(&self) -> IssueAnalyzer {
        IssueAnalyzer::new()
            .with_calendar(self.calendar.clone())
            .with_labels(self.labels.clone())
            .with_tracked_statuses(self.tracked_statuses.clone())
            .with_team_resolver(self.team_resolver())
            .with_story_points_field(self.jira.story_points_field.clone())
    }

    pub fn window_timezone(&self) -> Result<Tz> {
        self.jira
            .window_timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("invalid jira.window_timezone {}: {e}", self.jira.window_timezone))
    }

    /// Local midnight of `date` in the configured zone, with the offset in
    /// force on that day.
    pub fn window_start(&self, date: NaiveDate) -> Result<DateTime<FixedOffset>> {
        let tz = self.window_timezone()?;
        date.and_hms_opt(0, 0, 0)
            .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
            .map(|start| start.fixed_offset())
            .ok_or_else(|| anyhow!("cannot localize {date} in {tz}"))
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<FlowMetricsConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = FlowMetricsConfig::load_env_file();
        FlowMetricsConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static FlowMetricsConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let config = config()?;
    tracing::info!(
        hours_per_day = config.calendar.hours_per_day,
        labels = config.labels.len(),
        "Configuration loaded successfully"
    );
    Ok(())
}
