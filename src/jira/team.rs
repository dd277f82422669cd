use super::JiraIssue;
use std::collections::HashMap;

/// Resolves the owning team of an issue.
///
/// Order: the configured team custom field, then a per-project default
/// (`TEAM_<PROJECT>`), then the project key itself. The result is
/// normalized to "Capitalized" form so `PLATFORM` and `platform ` collapse
/// into the same bucket.
#[derive(Debug, Clone, Default)]
pub struct TeamResolver {
    team_field: Option<String>,
    project_defaults: HashMap<String, String>,
}

impl TeamResolver {
    pub fn new(team_field: Option<String>, project_defaults: HashMap<String, String>) -> Self {
        Self {
            team_field,
            project_defaults: project_defaults
                .into_iter()
                .map(|(project, team)| (project.to_uppercase(), team))
                .collect(),
        }
    }

    /// Build a resolver whose project defaults come from `TEAM_<PROJECT>`
    /// environment variables.
    pub fn from_env(team_field: Option<String>) -> Self {
        let defaults = std::env::vars()
            .filter_map(|(name, value)| {
                name.strip_prefix("TEAM_")
                    .filter(|project| !project.is_empty())
                    .map(|project| (project.to_string(), value))
            })
            .collect();
        Self::new(team_field, defaults)
    }

    pub fn resolve(&self, issue: &JiraIssue) -> String {
        if let Some(team) = self
            .team_field
            .as_deref()
            .and_then(|field| issue.custom_option(field))
            .filter(|team| !team.trim().is_empty())
        {
            return capitalize(team);
        }

        let project_key = issue.project_key().unwrap_or("unknown").to_uppercase();
        match self.project_defaults.get(&project_key) {
            Some(team) => capitalize(team),
            None => capitalize(&project_key),
        }
    }
}

/// `" plATform "` -> `"Platform"`
pub fn capitalize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(fields: serde_json::Value) -> JiraIssue {
        serde_json::from_value(serde_json::json!({"key": "ENG-1", "fields": fields})).unwrap()
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize(" plATform "), "Platform");
        assert_eq!(capitalize("ENG"), "Eng");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_team_field_wins() {
        let resolver = TeamResolver::new(Some("customfield_10075".to_string()), HashMap::new());
        let issue = issue(serde_json::json!({
            "project": {"key": "ENG"},
            "customfield_10075": {"value": "PAYMENTS"}
        }));
        assert_eq!(resolver.resolve(&issue), "Payments");
    }

    #[test]
    fn test_project_default_then_project_key() {
        let mut defaults = HashMap::new();
        defaults.insert("eng".to_string(), "core".to_string());
        let resolver = TeamResolver::new(Some("customfield_10075".to_string()), defaults);

        let eng = issue(serde_json::json!({"project": {"key": "ENG"}, "customfield_10075": null}));
        assert_eq!(resolver.resolve(&eng), "Core");

        let ops = issue(serde_json::json!({"project": {"key": "OPS"}}));
        assert_eq!(resolver.resolve(&ops), "Ops");
    }
}
