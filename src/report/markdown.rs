//! Markdown audit reports
//!
//! This module renders a human-readable report of one audit: scores, the
//! signal sets, enrichment data and the prioritized issue list.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::model::{AuditResult, PerformanceStatus, Severity};
use crate::report::ReportResult;

/// Writes a markdown report of an audit to a file
///
/// # Arguments
///
/// * `result` - The audit result
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(ReportError)` - Failed to write the report
pub fn write_markdown_report(result: &AuditResult, output_path: &Path) -> ReportResult<()> {
    let markdown = format_markdown_report(result);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats an audit result as markdown
pub fn format_markdown_report(result: &AuditResult) -> String {
    let mut md = String::new();

    md.push_str(&format!("# SEO Audit: {}\n\n", result.domain));
    md.push_str(&format!("- **URL**: {}\n", result.url));
    md.push_str(&format!(
        "- **Audited**: {}\n\n",
        result.audited_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    // Scores
    let scores = &result.scores;
    md.push_str("## Scores\n\n");
    md.push_str("| Area | Score |\n");
    md.push_str("|------|-------|\n");
    md.push_str(&format!("| **Overall** | **{}** |\n", scores.overall));
    md.push_str(&format!("| Technical | {} |\n", scores.technical));
    md.push_str(&format!("| On-page | {} |\n", scores.onpage));
    md.push_str(&format!("| Content | {} |\n", scores.content));
    if let Some(competitor) = scores.competitor {
        md.push_str(&format!("| Search visibility | {} |\n", competitor));
    }
    md.push('\n');

    // Technical
    let t = &result.technical;
    md.push_str("## Technical\n\n");
    md.push_str(&format!("- **HTTPS**: {}\n", yes_no(t.https)));
    md.push_str(&format!("- **Mobile viewport**: {}\n", yes_no(t.mobile_viewport)));
    md.push_str(&format!("- **robots.txt**: {}\n", yes_no(t.robots_txt_present)));
    md.push_str(&format!("- **Crawlable**: {}\n", yes_no(t.crawlable)));
    md.push_str(&format!("- **XML sitemap**: {}\n", yes_no(t.sitemap_present)));
    md.push_str(&format!(
        "- **Performance**: {}\n",
        performance_label(result.performance_status)
    ));
    for (name, value, unit) in [
        ("LCP", t.lcp, "s"),
        ("FCP", t.fcp, "s"),
        ("TTI", t.tti, "s"),
        ("CLS", t.cls, ""),
    ] {
        if let Some(value) = value {
            md.push_str(&format!("  - {}: {:.2}{}\n", name, value, unit));
        }
    }
    md.push('\n');

    // On-page
    let o = &result.onpage;
    md.push_str("## On-page\n\n");
    md.push_str(&format!(
        "- **Title**: {} characters{}\n",
        o.title.length,
        if o.title.optimal { " (optimal)" } else { "" }
    ));
    let description = if o.description.missing {
        "missing".to_string()
    } else {
        format!("{} characters", o.description.length)
    };
    md.push_str(&format!("- **Meta description**: {}\n", description));
    md.push_str(&format!(
        "- **Headings**: {} H1, {} H2, {} H3\n",
        o.h1, o.h2, o.h3
    ));
    md.push_str(&format!(
        "- **Images**: {} total, {} missing alt text\n",
        o.images.total, o.images.missing
    ));
    md.push_str(&format!(
        "- **Links**: {} internal, {} external ({} nofollow)\n",
        o.links.internal, o.links.external, o.links.external_nofollow
    ));
    md.push_str(&format!(
        "- **Canonical / Open Graph / Twitter Card / Structured data**: {} / {} / {} / {}\n\n",
        yes_no(o.canonical),
        yes_no(o.open_graph),
        yes_no(o.twitter_card),
        yes_no(o.structured_data)
    ));

    // Content
    let c = &result.content;
    md.push_str("## Content\n\n");
    md.push_str(&format!("- **Words**: {}\n", c.word_count));
    md.push_str(&format!("- **Readability**: {}/100\n", c.readability));
    if c.duplicate {
        md.push_str("- **Duplicate**: content matches another audited site\n");
    }
    if !c.keyword_density.is_empty() {
        md.push_str("\n| Keyword | Density |\n");
        md.push_str("|---------|---------|\n");
        for keyword in &c.keyword_density {
            md.push_str(&format!("| {} | {:.2}% |\n", keyword.term, keyword.pct));
        }
    }
    md.push('\n');

    if let Some(local) = &result.local_seo {
        md.push_str("## Local SEO\n\n");
        if !local.phone_numbers.is_empty() {
            md.push_str(&format!("- **Phone numbers**: {}\n", local.phone_numbers.join(", ")));
        }
        md.push_str(&format!("- **Address**: {}\n", yes_no(local.has_address)));
        md.push_str(&format!(
            "- **LocalBusiness schema**: {}\n",
            yes_no(local.has_local_business_schema)
        ));
        md.push_str(&format!("- **Map embed**: {}\n", yes_no(local.has_map_embed)));
        md.push_str(&format!("- **NAP consistent**: {}\n\n", yes_no(local.nap_consistent)));
    }

    // Backlinks
    if let Some(backlinks) = &result.backlinks {
        md.push_str("## Backlinks\n\n");
        md.push_str(&format!(
            "- **Backlinks**: {}\n- **Referring domains**: {}\n",
            backlinks.total_count, backlinks.domain_count
        ));
        if let Some(source) = &backlinks.source {
            md.push_str(&format!("- **Source**: {}\n", source));
        }
        if !backlinks.anchor_text.is_empty() {
            md.push_str("\n| Anchor text | Links |\n");
            md.push_str("|-------------|-------|\n");
            for anchor in &backlinks.anchor_text {
                md.push_str(&format!("| {} | {} |\n", escape_cell(&anchor.text), anchor.count));
            }
        }
        md.push('\n');
    }

    // Rankings
    if !result.keyword_rankings.is_empty() {
        md.push_str("## Keyword Rankings\n\n");
        md.push_str("| Keyword | Position | URL |\n");
        md.push_str("|---------|----------|-----|\n");
        for ranking in &result.keyword_rankings {
            let position = ranking
                .rank
                .map(|r| r.to_string())
                .unwrap_or_else(|| "not in top 100".to_string());
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                ranking.keyword,
                position,
                ranking.url.as_deref().unwrap_or("-")
            ));
        }
        md.push('\n');
    }

    // Issues
    md.push_str("## Issues\n\n");
    if result.issues.is_empty() {
        md.push_str("No issues found.\n");
    }
    for severity in [
        Severity::Critical,
        Severity::Warning,
        Severity::Info,
        Severity::Good,
    ] {
        let matching: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect();
        if matching.is_empty() {
            continue;
        }

        md.push_str(&format!(
            "### {} ({})\n\n",
            severity_heading(severity),
            matching.len()
        ));
        for issue in matching {
            md.push_str(&format!("- **{}**: {}\n", issue.title, issue.description));
            if severity != Severity::Good {
                md.push_str(&format!("  - Fix: {}\n", issue.fix_suggestion));
            }
        }
        md.push('\n');
    }

    md
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn performance_label(status: PerformanceStatus) -> &'static str {
    match status {
        PerformanceStatus::Measured => "measured",
        PerformanceStatus::Pending => "pending (measuring in the background)",
        PerformanceStatus::Unavailable => "unavailable",
        PerformanceStatus::Unconfigured => "not configured",
    }
}

fn severity_heading(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "Critical",
        Severity::Warning => "Warnings",
        Severity::Info => "Suggestions",
        Severity::Good => "Passed",
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
