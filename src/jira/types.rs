use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Response body of `/rest/api/2/search?expand=changelog`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<JiraIssue>,
}

/// Files on disk are either a full search response or a bare issue array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum IssuePayload {
    Search(SearchResponse),
    List(Vec<JiraIssue>),
}

impl IssuePayload {
    pub(crate) fn into_issues(self) -> Vec<JiraIssue> {
        match self {
            IssuePayload::Search(response) => response.issues,
            IssuePayload::List(issues) => issues,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssue {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
    #[serde(default)]
    pub changelog: Changelog,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub assignee: Option<UserRef>,
    #[serde(default)]
    pub issuelinks: Option<Vec<IssueLink>>,
    /// Everything else, including `customfield_*` entries. Read through the
    /// typed accessors on [`JiraIssue`], never by key at call sites.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRef {
    pub key: String,
}

/// A link to another issue. Only the outward side is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueLink {
    #[serde(rename = "outwardIssue", default)]
    pub outward_issue: Option<LinkedIssue>,
    #[serde(rename = "inwardIssue", default)]
    pub inward_issue: Option<LinkedIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedIssue {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<RawHistory>,
}

/// One changelog entry: a timestamp and the field changes made at that time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHistory {
    pub created: String,
    #[serde(default)]
    pub author: Option<UserRef>,
    #[serde(default)]
    pub items: Vec<ChangeItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeItem {
    pub field: String,
    #[serde(rename = "fromString", default)]
    pub from_text: Option<String>,
    #[serde(rename = "toString", default)]
    pub to_text: Option<String>,
}

impl ChangeItem {
    pub fn is_status_change(&self) -> bool {
        self.field == "status"
    }
}

impl JiraIssue {
    pub fn project_key(&self) -> Option<&str> {
        self.fields.project.as_ref().map(|p| p.key.as_str())
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.fields.assignee.as_ref().map(|a| a.display_name.as_str())
    }

    /// Keys of outward-linked issues, in link order.
    pub fn outward_links(&self) -> Vec<String> {
        self.fields
            .issuelinks
            .iter()
            .flatten()
            .filter_map(|link| link.outward_issue.as_ref())
            .map(|issue| issue.key.clone())
            .collect()
    }

    /// Value of a select-list custom field (`{"value": "..."}`) or a plain
    /// string custom field.
    pub fn custom_option(&self, field_id: &str) -> Option<&str> {
        match self.fields.extra.get(field_id)? {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("value").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Numeric custom field such as story points. Strings holding a number
    /// are accepted since some Jira instances store points as text.
    pub fn custom_number(&self, field_id: &str) -> Option<f64> {
        match self.fields.extra.get(field_id)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
