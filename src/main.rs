use anyhow::Result;
use clap::Parser;
use flow_metrics::cli::commands::{
    Command, CycleTimeCommand, ReleaseFailureCommand, StatusDurationsCommand, ThroughputCommand,
    TimelineCommand,
};
use flow_metrics::cli::{Cli, Commands};
use flow_metrics::config::{config, FlowMetricsConfig};
use flow_metrics::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file first so FLOW_METRICS_* overrides apply
    FlowMetricsConfig::load_env_file()?;
    let config = config()?.clone();

    let level = if cli.verbose {
        "debug"
    } else {
        config.observability.log_level.as_str()
    };
    init_telemetry(level, config.observability.json_logs)?;

    match cli.command {
        Commands::CycleTime {
            input,
            window_start,
            detailed,
            json,
        } => {
            CycleTimeCommand::new(input, config)
                .with_window_start(window_start)
                .with_detailed(detailed)
                .with_json(json)
                .execute()
                .await
        }
        Commands::StatusDurations {
            input,
            statuses,
            json,
        } => {
            StatusDurationsCommand::new(input, config)
                .with_statuses(statuses)
                .with_json(json)
                .execute()
                .await
        }
        Commands::Throughput { input, team, json } => {
            ThroughputCommand::new(input, config)
                .with_team(team)
                .with_json(json)
                .execute()
                .await
        }
        Commands::ReleaseFailure {
            input,
            exempt,
            json,
        } => {
            ReleaseFailureCommand::new(input, config)
                .with_exempt(exempt)
                .with_json(json)
                .execute()
                .await
        }
        Commands::Timeline { input, issue } => {
            TimelineCommand::new(input, issue, config).execute().await
        }
    }
}
