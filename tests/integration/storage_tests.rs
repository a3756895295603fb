//! Persistence of audits in an on-disk SQLite database

use seo_audit::config::{parse_config, AuditConfig};
use seo_audit::enrichment::{build_provider_client, PageSpeedClient};
use seo_audit::model::{IssueCategory, PerformanceStatus};
use seo_audit::storage::{open_storage, shared, with_store, AuditStore};
use seo_audit::{AuditPipeline, AuditState, Severity};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures::{FixedFiles, StaticPage, HOMEPAGE};

#[tokio::test]
async fn test_late_metrics_merge_into_stored_audit() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("audits.db");

    // Slower than the foreground budget, well within the background one
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "lighthouseResult": {
                        "audits": {
                            "largest-contentful-paint": { "numericValue": 4200.0 },
                            "first-contentful-paint": { "numericValue": 980.0 }
                        }
                    }
                }))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&mock_server)
        .await;

    let config = parse_config(&format!(
        r#"
        [audit]
        performance-timeout-secs = 1
        background-performance-timeout-secs = 10

        [providers.pagespeed]
        endpoint = "{}/runPagespeed"
        "#,
        mock_server.uri()
    ))
    .unwrap();
    let pagespeed =
        PageSpeedClient::from_config(build_provider_client(&config).unwrap(), &config).unwrap();

    let store = shared(open_storage(&db_path).unwrap());
    let pipeline = AuditPipeline::new(
        Arc::new(StaticPage::new(HOMEPAGE, "https://example.com/")),
        Arc::new(FixedFiles::robots_only()),
    )
    .with_audit_config(config.audit.clone())
    .with_performance(Arc::new(pagespeed))
    .with_store(store);

    let run = pipeline.start_audit("example.com").await.unwrap();
    assert_eq!(run.result.performance_status, PerformanceStatus::Pending);
    assert_eq!(run.result.technical.lcp, None);
    assert_eq!(run.result.scores.technical, 65);
    let foreground_issues = run.result.issues.len();

    let merged = run
        .enrichment
        .expect("background retry")
        .wait()
        .await
        .expect("late metrics merged");
    assert_eq!(merged.lcp, Some(4.2));
    drop(pipeline);

    // Everything must be readable from a fresh connection
    let reopened = open_storage(&db_path).unwrap();
    let record = reopened.get_audit(run.record_id.unwrap()).unwrap();
    assert_eq!(record.state, AuditState::Completed);
    assert!(record.completed_at.is_some());

    let stored = record.result.unwrap();
    assert_eq!(stored.performance_status, PerformanceStatus::Measured);
    assert_eq!(stored.technical.lcp, Some(4.2));
    assert_eq!(stored.technical.fcp, Some(0.98));
    // LCP misses the threshold, FCP earns its 10 points
    assert_eq!(stored.scores.technical, 75);
    assert_eq!(stored.scores.onpage, run.result.scores.onpage);
    assert_eq!(
        stored.scores.overall,
        seo_audit::scoring::overall_score(75, stored.scores.onpage, stored.scores.content)
    );

    // The late LCP warning joins the technical warnings, after the sitemap one
    assert_eq!(stored.issues.len(), foreground_issues + 1);
    let late_at = stored
        .issues
        .iter()
        .position(|i| i.title == "Slow Largest Contentful Paint")
        .unwrap();
    let late = &stored.issues[late_at];
    assert_eq!(late.severity, Severity::Warning);
    assert_eq!(late.category, IssueCategory::Technical);
    assert_eq!(stored.issues[late_at - 1].title, "Missing XML sitemap");
    assert!(stored.issues[late_at + 1..]
        .iter()
        .all(|i| i.category != IssueCategory::Technical || i.severity != Severity::Warning));

    let ranks: Vec<(u8, u8)> = stored
        .issues
        .iter()
        .map(|i| (i.severity.rank(), i.category.rank()))
        .collect();
    let mut sorted = ranks.clone();
    sorted.sort();
    assert_eq!(ranks, sorted);

    let mut foreground = stored.issues.clone();
    foreground.remove(late_at);
    assert_eq!(foreground, run.result.issues);
}

#[tokio::test]
async fn test_pipeline_opens_configured_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("nested-audits.db");

    let config = parse_config(&format!(
        "[output]\ndatabase-path = {:?}",
        db_path.to_string_lossy()
    ))
    .unwrap();
    let pipeline = AuditPipeline::from_config(&config).unwrap();

    assert!(pipeline.store().is_some());
    assert!(db_path.exists());

    let id = with_store(pipeline.store().unwrap(), |s| {
        s.create_audit_record("example.com")
    })
    .unwrap();
    let record = with_store(pipeline.store().unwrap(), |s| s.get_audit(id)).unwrap();
    assert_eq!(record.state, AuditState::Fetching);
    assert!(record.result.is_none());
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("audits.db");

    let first_id = {
        let pipeline = AuditPipeline::new(
            Arc::new(StaticPage::new(HOMEPAGE, "https://example.com/")),
            Arc::new(FixedFiles::robots_only()),
        )
        .with_audit_config(AuditConfig::default())
        .with_store(shared(open_storage(&db_path).unwrap()));
        pipeline
            .start_audit("example.com")
            .await
            .unwrap()
            .record_id
            .unwrap()
    };

    // A second process auditing a copy of the page sees the first record
    let pipeline = AuditPipeline::new(
        Arc::new(StaticPage::new(HOMEPAGE, "https://copycat.net/")),
        Arc::new(FixedFiles::robots_only()),
    )
    .with_store(shared(open_storage(&db_path).unwrap()));
    let run = pipeline.start_audit("copycat.net").await.unwrap();

    assert_ne!(run.record_id, Some(first_id));
    assert!(run.result.content.duplicate);
    assert!(run
        .result
        .issues
        .iter()
        .any(|i| i.title == "Duplicate content detected"));
}
