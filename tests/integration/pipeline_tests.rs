//! End-to-end audits over stub sources

use async_trait::async_trait;
use chrono::Utc;
use seo_audit::config::AuditConfig;
use seo_audit::enrichment::{
    BacklinkChain, BacklinkSource, KeywordTracker, OrganicResult, ProviderError, ProviderResult,
    RankProvider,
};
use seo_audit::model::PerformanceStatus;
use seo_audit::storage::{shared, with_store, AuditStore, SqliteStore};
use seo_audit::{AuditPipeline, AuditState, BacklinkData, Severity};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::fixtures::{FixedFiles, StaticPage, StubMetrics, HOMEPAGE};

fn pipeline() -> AuditPipeline {
    AuditPipeline::new(
        Arc::new(StaticPage::new(HOMEPAGE, "https://example.com/")),
        Arc::new(FixedFiles::robots_only()),
    )
}

fn settings(performance_timeout_secs: u64) -> AuditConfig {
    AuditConfig {
        performance_timeout_secs,
        background_performance_timeout_secs: 1,
        ..Default::default()
    }
}

/// Backlink source with a canned answer and a call counter
struct CannedBacklinks {
    name: &'static str,
    answer: fn() -> ProviderResult<BacklinkData>,
    delay: Duration,
    calls: AtomicUsize,
}

impl CannedBacklinks {
    fn new(name: &'static str, answer: fn() -> ProviderResult<BacklinkData>) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl BacklinkSource for CannedBacklinks {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self, _domain: &str) -> ProviderResult<BacklinkData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.answer)()
    }
}

fn unreachable_provider() -> ProviderResult<BacklinkData> {
    Err(ProviderError::Http {
        provider: "moz".to_string(),
        message: "connection refused".to_string(),
    })
}

fn verified_counts() -> ProviderResult<BacklinkData> {
    Ok(BacklinkData {
        total_count: 150,
        domain_count: 12,
        anchor_text: Vec::new(),
        last_checked: Utc::now(),
        source: None,
    })
}

fn nothing_known() -> ProviderResult<BacklinkData> {
    Ok(BacklinkData::no_data())
}

/// Ranks example.com second for every query
struct SecondPlace;

#[async_trait]
impl RankProvider for SecondPlace {
    fn name(&self) -> &str {
        "stub-serp"
    }

    async fn search(
        &self,
        keyword: &str,
        _location: Option<&str>,
    ) -> ProviderResult<Vec<OrganicResult>> {
        Ok(vec![
            OrganicResult {
                position: Some(1),
                link: format!("https://{}-reviews.org/", keyword),
                title: None,
            },
            OrganicResult {
                position: Some(2),
                link: "https://www.example.com/catalog".to_string(),
                title: Some("Acme Widgets catalog".to_string()),
            },
        ])
    }
}

#[tokio::test]
async fn test_end_to_end_scores() {
    let result = pipeline()
        .with_performance(Arc::new(StubMetrics::fast()))
        .run_audit("example.com")
        .await
        .unwrap();

    assert_eq!(result.url, "https://example.com/");
    assert_eq!(result.onpage.title.length, 45);
    assert_eq!(result.onpage.description.length, 140);
    assert!(!result.technical.sitemap_present);
    assert_eq!(result.technical.lcp, Some(1.2));
    assert_eq!(result.performance_status, PerformanceStatus::Measured);

    // https 30 + viewport 20 + robots.txt 15 + LCP 10 + FCP 10
    assert_eq!(result.scores.technical, 85);
    assert!(result.scores.onpage >= 75, "onpage {}", result.scores.onpage);
    assert!(result
        .issues
        .iter()
        .all(|issue| issue.severity != Severity::Critical));
    assert!(result
        .issues
        .iter()
        .any(|issue| issue.title == "Missing XML sitemap"));
}

#[tokio::test]
async fn test_performance_timeout_still_completes() {
    let started = Instant::now();
    let result = pipeline()
        .with_audit_config(settings(1))
        .with_performance(Arc::new(StubMetrics::slow(Duration::from_secs(30))))
        .run_audit("example.com")
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(result.technical.lcp, None);
    assert_eq!(result.technical.fcp, None);
    assert_eq!(result.performance_status, PerformanceStatus::Unavailable);
    // https 30 + viewport 20 + robots.txt 15
    assert_eq!(result.scores.technical, 65);
}

#[tokio::test]
async fn test_missed_metrics_retry_in_background() {
    let store = shared(SqliteStore::new_in_memory().unwrap());
    let run = pipeline()
        .with_audit_config(settings(1))
        .with_performance(Arc::new(StubMetrics::slow(Duration::from_secs(30))))
        .with_store(store.clone())
        .start_audit("example.com")
        .await
        .unwrap();

    assert_eq!(run.result.performance_status, PerformanceStatus::Pending);
    let task = run.enrichment.expect("background task for missed metrics");

    // The retry times out as well and records that no metrics are coming
    assert!(task.wait().await.is_none());

    let id = run.record_id.unwrap();
    let record = with_store(&store, |s| s.get_audit(id)).unwrap();
    assert_eq!(record.state, AuditState::Completed);
    assert_eq!(
        record.result.unwrap().performance_status,
        PerformanceStatus::Unavailable
    );
}

#[tokio::test]
async fn test_backlink_chain_falls_through_to_verified_data() {
    let failing = CannedBacklinks::new("moz", unreachable_provider);
    let empty = CannedBacklinks::new("ahrefs", nothing_known);
    let answering = CannedBacklinks::new("free-checker", verified_counts);
    let never_reached = CannedBacklinks::new("backup-checker", verified_counts);

    let chain = BacklinkChain::new(Duration::from_secs(5))
        .with_source(failing.clone())
        .with_source(empty.clone())
        .with_source(answering.clone())
        .with_source(never_reached.clone());

    let store = shared(SqliteStore::new_in_memory().unwrap());
    let run = pipeline()
        .with_backlinks(chain)
        .with_store(store.clone())
        .start_audit("example.com")
        .await
        .unwrap();

    let backlinks = run.result.backlinks.clone().expect("verified backlink data");
    assert_eq!(backlinks.total_count, 150);
    assert_eq!(backlinks.domain_count, 12);
    assert_eq!(backlinks.source.as_deref(), Some("free-checker"));
    assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    assert_eq!(empty.calls.load(Ordering::SeqCst), 1);
    assert_eq!(never_reached.calls.load(Ordering::SeqCst), 0);

    let stored = with_store(&store, |s| s.get_audit(run.record_id.unwrap()))
        .unwrap()
        .result
        .unwrap();
    let stored_backlinks = stored.backlinks.expect("stored backlink data");
    assert_eq!(stored_backlinks.total_count, 150);
    assert_eq!(stored_backlinks.domain_count, 12);
    assert_eq!(stored_backlinks.source, backlinks.source);
}

#[tokio::test]
async fn test_no_backlink_data_is_not_a_zero() {
    let chain = BacklinkChain::new(Duration::from_secs(5))
        .with_source(CannedBacklinks::new("moz", unreachable_provider))
        .with_source(CannedBacklinks::new("ahrefs", nothing_known));

    let store = shared(SqliteStore::new_in_memory().unwrap());
    let run = pipeline()
        .with_backlinks(chain)
        .with_store(store.clone())
        .start_audit("example.com")
        .await
        .unwrap();

    assert!(run.result.backlinks.is_none());
    let stored = with_store(&store, |s| s.get_audit(run.record_id.unwrap()))
        .unwrap()
        .result
        .unwrap();
    assert!(stored.backlinks.is_none());
}

#[tokio::test]
async fn test_deadline_keeps_partial_enrichment() {
    let slow = Arc::new(CannedBacklinks {
        name: "slow-checker",
        answer: verified_counts,
        delay: Duration::from_secs(30),
        calls: AtomicUsize::new(0),
    });
    let chain = BacklinkChain::new(Duration::from_secs(60)).with_source(slow);

    let started = Instant::now();
    let result = pipeline()
        .with_audit_config(AuditConfig {
            deadline_secs: 1,
            ..Default::default()
        })
        .with_performance(Arc::new(StubMetrics::fast()))
        .with_backlinks(chain)
        .run_audit("example.com")
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(result.backlinks.is_none());
    assert_eq!(result.performance_status, PerformanceStatus::Measured);
    assert_eq!(result.technical.lcp, Some(1.2));
}

#[tokio::test]
async fn test_tracked_keywords_feed_competitor_score() {
    let tracker = KeywordTracker::new(Some(Arc::new(SecondPlace)), Duration::from_secs(5));
    let result = pipeline()
        .with_audit_config(AuditConfig {
            tracked_keywords: 2,
            ..Default::default()
        })
        .with_tracker(tracker)
        .run_audit("example.com")
        .await
        .unwrap();

    assert_eq!(result.keyword_rankings.len(), 2);
    for ranking in &result.keyword_rankings {
        assert_eq!(ranking.rank, Some(2));
        assert_eq!(
            ranking.url.as_deref(),
            Some("https://www.example.com/catalog")
        );
    }
    assert_eq!(result.scores.competitor, Some(100));
}

#[tokio::test]
async fn test_duplicate_content_across_domains() {
    let store = shared(SqliteStore::new_in_memory().unwrap());
    let audit = |domain: &'static str| {
        let store = store.clone();
        async move {
            pipeline()
                .with_store(store)
                .run_audit(domain)
                .await
                .unwrap()
        }
    };

    let first = audit("example.com").await;
    let again = audit("www.example.com").await;
    let copy = audit("copycat.net").await;

    assert!(!first.content.duplicate);
    assert!(!again.content.duplicate);
    assert!(copy.content.duplicate);
    assert!(copy.scores.content < first.scores.content);
}
