// Jira payload ingestion
// Maps the loosely-typed search response onto fixed record types

pub mod team;
pub mod types;

pub use team::TeamResolver;
pub use types::*;

use crate::error::Result;
use std::path::Path;
use tracing::{debug, info};

/// Parse a saved Jira search response (or bare issue array).
pub fn parse_issues(json: &str) -> Result<Vec<JiraIssue>> {
    let payload: IssuePayload = serde_json::from_str(json)?;
    let issues = payload.into_issues();
    debug!(count = issues.len(), "Parsed Jira issues");
    Ok(issues)
}

/// Read and parse a Jira payload file.
pub async fn load_issues<P: AsRef<Path>>(path: P) -> Result<Vec<JiraIssue>> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path).await?;
    let issues = parse_issues(&json)?;
    info!(path = %path.display(), count = issues.len(), "Loaded Jira issues");
    Ok(issues)
}
