use serde::{Deserialize, Serialize};
use std::fmt;

/// How urgent an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Good,
}

impl Severity {
    /// Position in the issue list, most urgent first
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Warning => 1,
            Self::Info => 2,
            Self::Good => 3,
        }
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Good => "good",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "critical" => Some(Self::Critical),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            "good" => Some(Self::Good),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// Which signal group produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Technical,
    OnPage,
    Content,
    Local,
}

impl IssueCategory {
    pub fn rank(&self) -> u8 {
        match self {
            Self::Technical => 0,
            Self::OnPage => 1,
            Self::Content => 2,
            Self::Local => 3,
        }
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::OnPage => "onpage",
            Self::Content => "content",
            Self::Local => "local",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "technical" => Some(Self::Technical),
            "onpage" => Some(Self::OnPage),
            "content" => Some(Self::Content),
            "local" => Some(Self::Local),
            _ => None,
        }
    }
}

/// A single finding in an audit
///
/// Issues have no identity beyond their position in the list of one audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub category: IssueCategory,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub fix_suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}
