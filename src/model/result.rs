use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ContentSignals, Issue, LocalSeoSignals, OnPageSignals, TechnicalSignals};

/// Browser timing metrics reported by the performance provider
///
/// Timings are in seconds. `None` means "not measured", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub lcp: Option<f64>,
    pub fcp: Option<f64>,
    pub tti: Option<f64>,
    pub cls: Option<f64>,
}

impl PerformanceMetrics {
    pub fn is_empty(&self) -> bool {
        self.lcp.is_none() && self.fcp.is_none() && self.tti.is_none() && self.cls.is_none()
    }
}

/// Where the performance metrics on a result stand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceStatus {
    /// Metrics arrived within the foreground budget
    Measured,
    /// A background attempt is still running and may merge metrics later
    Pending,
    /// The provider failed and no retry is running
    Unavailable,
    /// No performance provider is configured
    Unconfigured,
}

impl PerformanceStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Measured => "measured",
            Self::Pending => "pending",
            Self::Unavailable => "unavailable",
            Self::Unconfigured => "unconfigured",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "measured" => Some(Self::Measured),
            "pending" => Some(Self::Pending),
            "unavailable" => Some(Self::Unavailable),
            "unconfigured" => Some(Self::Unconfigured),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorText {
    pub text: String,
    pub count: u64,
}

/// Backlink summary for a domain
///
/// A value with `total_count == 0 && domain_count == 0` means no provider had
/// information. It is not a verified zero and must never be persisted as one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklinkData {
    pub total_count: u64,
    pub domain_count: u64,
    pub anchor_text: Vec<AnchorText>,
    pub last_checked: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl BacklinkData {
    /// The sentinel returned when no provider had any data
    pub fn no_data() -> Self {
        Self {
            total_count: 0,
            domain_count: 0,
            anchor_text: Vec::new(),
            last_checked: Utc::now(),
            source: None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.total_count == 0 && self.domain_count == 0
    }
}

/// Search position of a domain for one keyword
///
/// `rank == None` means the domain was not found in the scanned results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRanking {
    pub keyword: String,
    pub rank: Option<u32>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub overall: u8,
    pub technical: u8,
    pub onpage: u8,
    pub content: u8,
    /// Search visibility across tracked keywords, when rankings were gathered
    pub competitor: Option<u8>,
}

/// Aggregate result of one audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub domain: String,
    /// The effective URL that served the audited page
    pub url: String,
    pub audited_at: DateTime<Utc>,
    pub scores: Scores,
    pub technical: TechnicalSignals,
    pub onpage: OnPageSignals,
    pub content: ContentSignals,
    pub issues: Vec<Issue>,
    pub backlinks: Option<BacklinkData>,
    pub local_seo: Option<LocalSeoSignals>,
    pub keyword_rankings: Vec<KeywordRanking>,
    pub performance_status: PerformanceStatus,
}
