//! Report rendering for audit results
//!
//! Results render as pretty-printed camelCase JSON (the shape handed to
//! collaborators) or as a markdown report for people.

mod markdown;

pub use markdown::{format_markdown_report, write_markdown_report};

use std::str::FromStr;
use thiserror::Error;

use crate::model::AuditResult;

/// Errors that can occur while producing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Output format for an audit report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Json,
    Markdown,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!("unknown report format '{}' (expected json or markdown)", other)),
        }
    }
}

/// Serializes a result as pretty-printed JSON
pub fn to_json(result: &AuditResult) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Renders a result in the requested format
pub fn render(result: &AuditResult, format: ReportFormat) -> ReportResult<String> {
    match format {
        ReportFormat::Json => to_json(result),
        ReportFormat::Markdown => Ok(format_markdown_report(result)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PerformanceStatus, Scores};
    use chrono::Utc;

    fn result() -> AuditResult {
        AuditResult {
            domain: "example.com".to_string(),
            url: "https://example.com/".to_string(),
            audited_at: Utc::now(),
            scores: Scores::default(),
            technical: Default::default(),
            onpage: Default::default(),
            content: Default::default(),
            issues: Vec::new(),
            backlinks: None,
            local_seo: None,
            keyword_rankings: Vec::new(),
            performance_status: PerformanceStatus::Pending,
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!("md".parse::<ReportFormat>(), Ok(ReportFormat::Markdown));
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&result()).unwrap()).unwrap();
        assert_eq!(json["performanceStatus"], "pending");
        assert_eq!(json["technical"]["mobileViewport"], false);
        assert!(json["backlinks"].is_null());
        assert!(json.get("keywordRankings").is_some());
    }

    #[test]
    fn test_render_markdown() {
        let md = render(&result(), ReportFormat::Markdown).unwrap();
        assert!(md.contains("No issues found."));
    }
}
