//! Data model shared by the analyzers, scorer, enrichment chain and storage
//!
//! Everything here serializes to camelCase JSON so results can be handed to
//! collaborators unchanged.

mod issue;
mod result;
mod signals;

pub use issue::{Issue, IssueCategory, Severity};
pub use result::{
    AnchorText, AuditResult, BacklinkData, KeywordRanking, PerformanceMetrics, PerformanceStatus,
    Scores,
};
pub use signals::{
    ContentSignals, DescriptionSignals, ImageSignals, KeywordDensity, LinkSignals,
    LocalSeoSignals, OnPageSignals, TechnicalSignals, TitleSignals,
};
