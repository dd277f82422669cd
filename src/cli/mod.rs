use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "flow-metrics")]
#[command(about = "Flow metrics from Jira status histories")]
#[command(long_about = "flow-metrics reads exported Jira issues with their changelogs and reports \
                       cycle time, time in status, throughput and release failures measured in business time. \
                       Start with 'flow-metrics cycle-time --input issues.json'.")]
pub struct Cli {
    /// Raise the log filter to debug
    #[arg(long, short = 'v', global = true, help = "Show debug logging on stderr")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Business time from first code review to last release, per team and month
    CycleTime {
        /// Jira search response or array of issues
        #[arg(long, help = "Path to the exported issues JSON")]
        input: PathBuf,
        /// Ignore issues released before this date
        #[arg(long, help = "Window start (YYYY-MM-DD), local midnight in the configured time zone")]
        window_start: Option<NaiveDate>,
        /// List every measured issue
        #[arg(long, help = "Include a per-issue breakdown")]
        detailed: bool,
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
    /// Business time spent in each tracked status
    StatusDurations {
        #[arg(long, help = "Path to the exported issues JSON")]
        input: PathBuf,
        /// Restrict to these statuses (repeatable)
        #[arg(long = "status", help = "Status to report on; defaults to all tracked statuses")]
        statuses: Vec<String>,
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
    /// Completed points and tickets per team member and month
    Throughput {
        #[arg(long, help = "Path to the exported issues JSON")]
        input: PathBuf,
        #[arg(long, help = "Only report on this team (case-insensitive)")]
        team: Option<String>,
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
    /// Monthly share of releases that were moved back out of Released
    ReleaseFailure {
        #[arg(long, help = "Path to the exported issues JSON")]
        input: PathBuf,
        /// Issues whose reverts are not counted as failures (repeatable)
        #[arg(long = "exempt", help = "Issue key never counted as a failed release")]
        exempt: Vec<String>,
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
    /// Numbered status transitions of a single issue
    Timeline {
        #[arg(long, help = "Path to the exported issues JSON")]
        input: PathBuf,
        #[arg(long, help = "Issue key, e.g. ENG-123")]
        issue: String,
    },
}
