use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Install the global subscriber.
///
/// `RUST_LOG` directives take precedence over `level`. Logs go to stderr so
/// report output on stdout stays machine-readable.
pub fn init_telemetry(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

    tracing::debug!(level, json, "flow-metrics telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking related operations
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one report run.
pub fn create_report_span(report: &str, input: &str, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "report",
        report = report,
        input = input,
        correlation.id = correlation_id,
    )
}
