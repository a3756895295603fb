//! The ordered issue rule table
//!
//! Rules are grouped technical, on-page, content, local. Each is evaluated
//! on its own; several may fire for the same signal.

use crate::analysis::{
    DESCRIPTION_MAX, DESCRIPTION_MIN, READABLE_SCORE, STUFFING_PCT, THIN_CONTENT_WORDS,
};
use crate::issues::IssueContext;
use crate::model::{Issue, IssueCategory, Severity};
use crate::scoring::{CLS_GOOD, FCP_GOOD_SECS, LCP_GOOD_SECS};

/// One row of the rule table
pub struct Rule {
    pub category: IssueCategory,
    pub severity: Severity,
    pub title: &'static str,
    pub applies: fn(&IssueContext<'_>) -> bool,
    pub describe: fn(&IssueContext<'_>) -> String,
    pub fix: &'static str,
}

impl Rule {
    pub(crate) fn to_issue(&self, context: &IssueContext<'_>, page_url: &str) -> Issue {
        Issue {
            category: self.category,
            severity: self.severity,
            title: self.title.to_string(),
            description: (self.describe)(context),
            fix_suggestion: self.fix.to_string(),
            page_url: Some(page_url.to_string()),
        }
    }
}

/// Rows of [`RULES`] that depend on performance metrics
pub const PERFORMANCE_RULES: std::ops::Range<usize> = 5..8;

pub static RULES: &[Rule] = &[
    // Technical
    Rule {
        category: IssueCategory::Technical,
        severity: Severity::Critical,
        title: "HTTPS not enabled",
        applies: |c| !c.technical.https,
        describe: |_| "The page is served over plain HTTP. Browsers mark it as not secure and search engines favor HTTPS pages.".to_string(),
        fix: "Install a TLS certificate and redirect all HTTP traffic to HTTPS.",
    },
    Rule {
        category: IssueCategory::Technical,
        severity: Severity::Critical,
        title: "robots.txt blocks crawlers",
        applies: |c| !c.technical.crawlable,
        describe: |_| "robots.txt disallows the site root for search engine crawlers, so the site cannot be indexed.".to_string(),
        fix: "Remove the `Disallow: /` rule for search engines from robots.txt.",
    },
    Rule {
        category: IssueCategory::Technical,
        severity: Severity::Warning,
        title: "Missing mobile viewport",
        applies: |c| !c.technical.mobile_viewport,
        describe: |_| "No responsive viewport meta tag was found. Mobile visitors see a zoomed-out desktop layout.".to_string(),
        fix: "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"> to the page head.",
    },
    Rule {
        category: IssueCategory::Technical,
        severity: Severity::Warning,
        title: "Missing robots.txt",
        applies: |c| !c.technical.robots_txt_present,
        describe: |_| "No robots.txt file was found at the site root.".to_string(),
        fix: "Publish a robots.txt that allows crawling and references your sitemap.",
    },
    Rule {
        category: IssueCategory::Technical,
        severity: Severity::Warning,
        title: "Missing XML sitemap",
        applies: |c| !c.technical.sitemap_present,
        describe: |_| "No XML sitemap was found at /sitemap.xml or in robots.txt.".to_string(),
        fix: "Generate an XML sitemap, publish it and reference it with a `Sitemap:` line in robots.txt.",
    },
    Rule {
        category: IssueCategory::Technical,
        severity: Severity::Warning,
        title: "Slow Largest Contentful Paint",
        applies: |c| c.technical.lcp.map(|v| v >= LCP_GOOD_SECS).unwrap_or(false),
        describe: |c| format!(
            "Largest Contentful Paint is {:.1}s; it should be under {}s.",
            c.technical.lcp.unwrap_or_default(),
            LCP_GOOD_SECS
        ),
        fix: "Optimize and preload the hero image, reduce render-blocking resources and improve server response time.",
    },
    Rule {
        category: IssueCategory::Technical,
        severity: Severity::Warning,
        title: "Slow First Contentful Paint",
        applies: |c| c.technical.fcp.map(|v| v >= FCP_GOOD_SECS).unwrap_or(false),
        describe: |c| format!(
            "First Contentful Paint is {:.1}s; it should be under {}s.",
            c.technical.fcp.unwrap_or_default(),
            FCP_GOOD_SECS
        ),
        fix: "Inline critical CSS, defer non-essential scripts and enable compression.",
    },
    Rule {
        category: IssueCategory::Technical,
        severity: Severity::Warning,
        title: "High Cumulative Layout Shift",
        applies: |c| c.technical.cls.map(|v| v > CLS_GOOD).unwrap_or(false),
        describe: |c| format!(
            "Cumulative Layout Shift is {:.2}; it should be {} or less.",
            c.technical.cls.unwrap_or_default(),
            CLS_GOOD
        ),
        fix: "Reserve space for images, embeds and ads with explicit width and height.",
    },
    Rule {
        category: IssueCategory::Technical,
        severity: Severity::Good,
        title: "Secure, mobile-ready foundation",
        applies: |c| c.technical.https && c.technical.mobile_viewport,
        describe: |_| "The page is served over HTTPS and declares a responsive viewport.".to_string(),
        fix: "No action needed.",
    },
    // On-page
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Critical,
        title: "Missing page title",
        applies: |c| c.onpage.title.length == 0,
        describe: |_| "The page has no <title>. Search results will show a generated title instead.".to_string(),
        fix: "Add a unique, descriptive <title> of 30 to 60 characters.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Warning,
        title: "Title length not optimal",
        applies: |c| c.onpage.title.length > 0 && !c.onpage.title.optimal,
        describe: |c| format!(
            "The title is {} characters long; 30 to 60 characters display best in search results.",
            c.onpage.title.length
        ),
        fix: "Rewrite the title to 30 to 60 characters with the main keyword near the start.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Critical,
        title: "Missing meta description",
        applies: |c| c.onpage.description.missing,
        describe: |_| "The page has no meta description, so search engines pick an arbitrary snippet.".to_string(),
        fix: "Add a meta description of 120 to 160 characters summarizing the page.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Warning,
        title: "Meta description too short",
        applies: |c| c.onpage.description.too_short,
        describe: |c| format!(
            "The meta description is {} characters; aim for at least {}.",
            c.onpage.description.length, DESCRIPTION_MIN
        ),
        fix: "Expand the meta description with a clear benefit and call to action.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Warning,
        title: "Meta description too long",
        applies: |c| c.onpage.description.too_long,
        describe: |c| format!(
            "The meta description is {} characters; anything past {} is truncated.",
            c.onpage.description.length, DESCRIPTION_MAX
        ),
        fix: "Trim the meta description to 160 characters or fewer.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Critical,
        title: "Missing H1 tag",
        applies: |c| c.onpage.h1 == 0,
        describe: |_| "The page has no H1 heading describing its main topic.".to_string(),
        fix: "Add exactly one H1 containing the page's primary keyword.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Warning,
        title: "Multiple H1 tags",
        applies: |c| c.onpage.h1 > 1,
        describe: |c| format!("The page has {} H1 headings.", c.onpage.h1),
        fix: "Keep a single H1 and demote the others to H2.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Info,
        title: "No H2 subheadings",
        applies: |c| c.onpage.h2 == 0,
        describe: |_| "The page has no H2 subheadings to structure its content.".to_string(),
        fix: "Break the content into sections with descriptive H2 headings.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Warning,
        title: "Images missing alt text",
        applies: |c| c.onpage.images.missing > 0,
        describe: |c| format!(
            "{} of {} images have no alt text.",
            c.onpage.images.missing, c.onpage.images.total
        ),
        fix: "Add concise alt text describing each meaningful image.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Info,
        title: "Missing canonical tag",
        applies: |c| !c.onpage.canonical,
        describe: |_| "No canonical URL is declared, so duplicate URLs may split ranking signals.".to_string(),
        fix: "Add <link rel=\"canonical\"> pointing at the preferred URL.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Info,
        title: "Missing Open Graph tags",
        applies: |c| !c.onpage.open_graph,
        describe: |_| "No Open Graph tags were found; shared links get a plain preview.".to_string(),
        fix: "Add og:title, og:description, og:image and og:url meta tags.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Info,
        title: "Missing Twitter Card tags",
        applies: |c| !c.onpage.twitter_card,
        describe: |_| "No twitter:card meta tag was found.".to_string(),
        fix: "Add <meta name=\"twitter:card\" content=\"summary_large_image\"> and related tags.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Info,
        title: "No structured data",
        applies: |c| !c.onpage.structured_data,
        describe: |_| "No JSON-LD or microdata was found, so the page is not eligible for rich results.".to_string(),
        fix: "Describe the organization or content with schema.org JSON-LD.",
    },
    Rule {
        category: IssueCategory::OnPage,
        severity: Severity::Warning,
        title: "No internal links",
        applies: |c| c.onpage.links.internal == 0,
        describe: |_| "The page links to no other page on the same site.".to_string(),
        fix: "Link to key pages of the site with descriptive anchor text.",
    },
    // Content
    Rule {
        category: IssueCategory::Content,
        severity: Severity::Warning,
        title: "Thin content",
        applies: |c| c.content.word_count <= THIN_CONTENT_WORDS,
        describe: |c| format!(
            "The page has {} words; pages with more than {} words tend to rank better.",
            c.content.word_count, THIN_CONTENT_WORDS
        ),
        fix: "Add original, useful copy that answers what visitors are looking for.",
    },
    Rule {
        category: IssueCategory::Content,
        severity: Severity::Info,
        title: "Hard-to-read content",
        applies: |c| c.content.readability <= READABLE_SCORE,
        describe: |c| format!(
            "The reading ease score is {} out of 100.",
            c.content.readability
        ),
        fix: "Use shorter sentences and simpler words.",
    },
    Rule {
        category: IssueCategory::Content,
        severity: Severity::Info,
        title: "No focus keywords detected",
        applies: |c| c.content.keyword_density.is_empty(),
        describe: |_| "No recurring topic terms were found in the page text.".to_string(),
        fix: "Focus the copy on a few descriptive terms and repeat them naturally.",
    },
    Rule {
        category: IssueCategory::Content,
        severity: Severity::Warning,
        title: "Possible keyword stuffing",
        applies: |c| {
            c.content
                .keyword_density
                .first()
                .map(|k| k.pct > STUFFING_PCT)
                .unwrap_or(false)
        },
        describe: |c| match c.content.keyword_density.first() {
            Some(top) => format!("\"{}\" makes up {:.2}% of the text.", top.term, top.pct),
            None => String::new(),
        },
        fix: "Use synonyms and related terms instead of repeating one keyword.",
    },
    Rule {
        category: IssueCategory::Content,
        severity: Severity::Warning,
        title: "Duplicate content detected",
        applies: |c| c.content.duplicate,
        describe: |_| "The same page text was already seen on another domain.".to_string(),
        fix: "Rewrite the copy so it is unique to this site, or declare a canonical source.",
    },
    Rule {
        category: IssueCategory::Content,
        severity: Severity::Good,
        title: "Substantial content",
        applies: |c| c.content.word_count > THIN_CONTENT_WORDS,
        describe: |c| format!("The page has {} words of content.", c.content.word_count),
        fix: "No action needed.",
    },
    // Local
    Rule {
        category: IssueCategory::Local,
        severity: Severity::Info,
        title: "Incomplete NAP details",
        applies: |c| {
            c.local
                .map(|l| {
                    (l.has_local_business_schema && l.phone_numbers.is_empty()) || !l.nap_consistent
                })
                .unwrap_or(false)
        },
        describe: |_| "The business name, address and phone number are missing or do not match the structured data.".to_string(),
        fix: "Show one phone number and address on the page and use the same values in LocalBusiness schema.",
    },
];
