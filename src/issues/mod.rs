//! Issue generation
//!
//! Issues are a derived view of the signal sets, produced by walking a fixed
//! rule table and ordering the matches most urgent first. Within a severity
//! the table order holds, so technical issues lead.

mod rules;

pub use rules::{Rule, PERFORMANCE_RULES, RULES};

use crate::model::{
    ContentSignals, Issue, LocalSeoSignals, OnPageSignals, Severity, TechnicalSignals,
};

/// The signals the rules are evaluated against
#[derive(Debug, Clone, Copy)]
pub struct IssueContext<'a> {
    pub technical: &'a TechnicalSignals,
    pub onpage: &'a OnPageSignals,
    pub content: &'a ContentSignals,
    pub local: Option<&'a LocalSeoSignals>,
}

/// Generates the ordered issue list for one page
///
/// # Arguments
///
/// * `context` - Signal sets of the audited page
/// * `page_url` - Effective URL attached to every issue
pub fn generate_issues(context: &IssueContext<'_>, page_url: &str) -> Vec<Issue> {
    let mut issues: Vec<Issue> = RULES
        .iter()
        .filter(|rule| (rule.applies)(context))
        .map(|rule| rule.to_issue(context, page_url))
        .collect();
    sort_issues(&mut issues);
    issues
}

/// Orders issues by severity, then category
///
/// The sort is stable, so rule-table order survives inside each group and
/// issues generated later land at the end of their group.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by_key(|issue| (issue.severity.rank(), issue.category.rank()));
}

/// Generates only the issues for measured performance metrics
///
/// Used when metrics arrive after the main issue list was stored.
pub fn generate_performance_issues(technical: &TechnicalSignals, page_url: &str) -> Vec<Issue> {
    let onpage = OnPageSignals::default();
    let content = ContentSignals::default();
    let context = IssueContext {
        technical,
        onpage: &onpage,
        content: &content,
        local: None,
    };

    RULES[PERFORMANCE_RULES]
        .iter()
        .filter(|rule| (rule.applies)(&context))
        .map(|rule| rule.to_issue(&context, page_url))
        .collect()
}

/// Number of issues at the given severity
pub fn count_severity(issues: &[Issue], severity: Severity) -> usize {
    issues.iter().filter(|i| i.severity == severity).count()
}
