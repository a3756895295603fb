//! Audit pipeline - main audit orchestration logic
//!
//! This module sequences one audit run:
//! - Fetching the homepage (HTTPS first, HTTP fallback)
//! - Running the analyzers alongside the robots.txt / sitemap probe
//! - The content gate and duplicate content lookup
//! - Enrichment under the global deadline
//! - Final scoring, issue generation and persistence
//! - Handing a missed performance measurement to a background task

use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::analysis::{analyze_page, apply_site_files, StopWords};
use crate::audit::background::{EnrichmentTask, PerformanceRetry};
use crate::config::{AuditConfig, Config};
use crate::enrichment::{
    build_provider_client, BacklinkChain, KeywordExtractor, KeywordTracker, PageSpeedClient,
    PerformanceSource,
};
use crate::fetcher::{
    build_http_client, BlockDetector, FetchedPage, HttpFetcher, HttpSiteProbe, PageSource,
    SiteProbe,
};
use crate::issues::{generate_issues, IssueContext};
use crate::model::{
    AuditResult, BacklinkData, ContentSignals, KeywordRanking, PerformanceMetrics,
    PerformanceStatus,
};
use crate::scoring::calculate_scores;
use crate::state::AuditState;
use crate::storage::{open_storage, shared, with_store, SharedStore};
use crate::url::{normalize_domain, origin_url};
use crate::{AuditError, Result};

/// Outcome of [`AuditPipeline::start_audit`]
#[derive(Debug)]
pub struct AuditRun {
    pub result: AuditResult,
    /// ID of the persisted record, when a store is attached
    pub record_id: Option<i64>,
    /// Background performance attempt, when the foreground one missed
    pub enrichment: Option<EnrichmentTask>,
}

/// How the foreground performance measurement went
enum PerformanceOutcome {
    Measured(PerformanceMetrics),
    Missed,
    Unconfigured,
}

/// Whatever enrichment arrived before the deadline
struct Enrichment {
    performance: PerformanceOutcome,
    backlinks: Option<BacklinkData>,
    rankings: Vec<KeywordRanking>,
}

/// Main audit orchestrator
///
/// Every collaborator sits behind a trait object, so the pipeline can run
/// against live HTTP sources or stubs.
pub struct AuditPipeline {
    source: Arc<dyn PageSource>,
    probe: Arc<dyn SiteProbe>,
    performance: Option<Arc<dyn PerformanceSource>>,
    backlinks: BacklinkChain,
    tracker: KeywordTracker,
    store: Option<SharedStore>,
    stopwords: Arc<StopWords>,
    settings: AuditConfig,
}

impl AuditPipeline {
    /// Creates a pipeline with no enrichment providers and no store
    pub fn new(source: Arc<dyn PageSource>, probe: Arc<dyn SiteProbe>) -> Self {
        let settings = AuditConfig::default();
        Self {
            source,
            probe,
            performance: None,
            backlinks: BacklinkChain::new(Duration::from_secs(settings.backlink_timeout_secs)),
            tracker: KeywordTracker::new(None, Duration::from_secs(settings.ranking_timeout_secs)),
            store: None,
            stopwords: Arc::new(StopWords::default()),
            settings,
        }
    }

    /// Builds the live pipeline described by a configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded and validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(AuditPipeline)` - HTTP sources, configured providers and, when
    ///   `[output] database-path` is set, a SQLite store
    /// * `Err(AuditError)` - A client, pattern or database failed to initialize
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent, &config.fetcher)?;
        let fetcher = HttpFetcher::new(client.clone(), BlockDetector::new(&config.block_detection));
        let probe = HttpSiteProbe::new(
            client,
            Duration::from_secs(config.fetcher.probe_timeout_secs),
        );

        let provider_client = build_provider_client(config)?;
        let mut pipeline = Self::new(Arc::new(fetcher), Arc::new(probe))
            .with_audit_config(config.audit.clone())
            .with_stopwords(StopWords::with_extra(&config.content.extra_stopwords))
            .with_backlinks(BacklinkChain::from_config(provider_client.clone(), config)?)
            .with_tracker(KeywordTracker::from_config(provider_client.clone(), config));

        if let Some(pagespeed) = PageSpeedClient::from_config(provider_client, config) {
            pipeline = pipeline.with_performance(Arc::new(pagespeed));
        }

        if let Some(path) = &config.output.database_path {
            tracing::info!("Persisting audits to {}", path);
            pipeline = pipeline.with_store(shared(open_storage(Path::new(path))?));
        }

        Ok(pipeline)
    }

    pub fn with_performance(mut self, source: Arc<dyn PerformanceSource>) -> Self {
        self.performance = Some(source);
        self
    }

    pub fn with_backlinks(mut self, chain: BacklinkChain) -> Self {
        self.backlinks = chain;
        self
    }

    pub fn with_tracker(mut self, tracker: KeywordTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_stopwords(mut self, stopwords: StopWords) -> Self {
        self.stopwords = Arc::new(stopwords);
        self
    }

    /// Replaces the deadline, timeouts and keyword tracking settings
    pub fn with_audit_config(mut self, settings: AuditConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn store(&self) -> Option<&SharedStore> {
        self.store.as_ref()
    }

    pub fn backlinks(&self) -> &BacklinkChain {
        &self.backlinks
    }

    pub fn tracker(&self) -> &KeywordTracker {
        &self.tracker
    }

    /// Keyword extraction over this pipeline's page source and stop-words
    pub fn keyword_extractor(&self) -> KeywordExtractor {
        KeywordExtractor::new(Arc::clone(&self.source), Arc::clone(&self.stopwords))
    }

    /// Audits a domain and returns its result
    ///
    /// A background performance attempt, if one was started, is detached.
    pub async fn run_audit(&self, domain: &str) -> Result<AuditResult> {
        self.start_audit(domain).await.map(|run| run.result)
    }

    /// Audits a domain, keeping the handle of any background enrichment
    ///
    /// # Errors
    ///
    /// * `InvalidDomain` - Malformed input, before any network call
    /// * `Fetch`, `AuthRequired`, `Blocked`, `InsufficientContent` - Terminal
    ///   audit failures; the record, if any, is marked failed
    /// * `Storage` - The store rejected a write
    pub async fn start_audit(&self, domain: &str) -> Result<AuditRun> {
        let domain = normalize_domain(domain)?;
        let deadline = Instant::now() + Duration::from_secs(self.settings.deadline_secs);
        tracing::info!("Starting audit of {}", domain);

        let record_id = match &self.store {
            Some(store) => Some(with_store(store, |s| s.create_audit_record(&domain))?),
            None => None,
        };

        match self.run_stages(&domain, record_id, deadline).await {
            Ok(run) => Ok(run),
            Err(e) => {
                tracing::warn!("Audit of {} failed: {}", domain, e);
                if let Some(id) = record_id {
                    self.record_failure(id, &e);
                }
                Err(e)
            }
        }
    }

    /// Measures a page with the foreground timeout
    ///
    /// Returns `None` when no provider is configured or the measurement
    /// failed or timed out.
    pub async fn get_performance_metrics(&self, url: &str) -> Option<PerformanceMetrics> {
        let source = self.performance.as_deref()?;
        self.measure(source, url).await
    }

    async fn run_stages(
        &self,
        domain: &str,
        record_id: Option<i64>,
        deadline: Instant,
    ) -> Result<AuditRun> {
        let FetchedPage {
            html,
            effective_url,
            status,
        } = self.source.fetch(domain).await?;
        tracing::info!("Fetched {} (HTTP {})", effective_url, status);
        self.advance(record_id, AuditState::Analyzing)?;

        let page_url = effective_url.to_string();
        let origin = origin_url(&effective_url).ok_or_else(|| AuditError::Fetch {
            url: page_url.clone(),
            message: "response URL has no host".to_string(),
        })?;

        // The parsed tree is not Send, so parsing and every analyzer run inside
        // one synchronous call driven alongside the probe
        let stopwords = Arc::clone(&self.stopwords);
        let (files, mut analysis) = tokio::join!(self.probe.probe(&origin), async move {
            analyze_page(&html, effective_url, &stopwords)
        });
        apply_site_files(&mut analysis.technical, &files);

        if analysis.insufficient {
            return Err(AuditError::InsufficientContent { url: page_url });
        }
        analysis.content.duplicate = self.is_duplicate(domain, &analysis.content);

        self.advance(record_id, AuditState::Scoring)?;
        let preliminary = calculate_scores(
            &analysis.technical,
            &analysis.onpage,
            &analysis.content,
            &[],
        );
        tracing::debug!(
            "Preliminary scores for {}: overall {}, technical {}, on-page {}, content {}",
            domain,
            preliminary.overall,
            preliminary.technical,
            preliminary.onpage,
            preliminary.content
        );

        self.advance(record_id, AuditState::Enriching)?;
        let keywords: Vec<String> = analysis
            .content
            .keyword_density
            .iter()
            .take(self.settings.tracked_keywords)
            .map(|k| k.term.clone())
            .collect();
        let enriched = self.enrich(domain, &page_url, &keywords, deadline).await;
        self.advance(record_id, AuditState::Scoring)?;

        let mut technical = analysis.technical;
        let performance_missed = matches!(enriched.performance, PerformanceOutcome::Missed);
        let performance_status = match &enriched.performance {
            PerformanceOutcome::Measured(metrics) => {
                technical.apply_metrics(metrics);
                PerformanceStatus::Measured
            }
            PerformanceOutcome::Unconfigured => PerformanceStatus::Unconfigured,
            PerformanceOutcome::Missed if record_id.is_some() => PerformanceStatus::Pending,
            PerformanceOutcome::Missed => PerformanceStatus::Unavailable,
        };

        let scores = calculate_scores(
            &technical,
            &analysis.onpage,
            &analysis.content,
            &enriched.rankings,
        );
        let issues = generate_issues(
            &IssueContext {
                technical: &technical,
                onpage: &analysis.onpage,
                content: &analysis.content,
                local: analysis.local.as_ref(),
            },
            &page_url,
        );

        let result = AuditResult {
            domain: domain.to_string(),
            url: page_url,
            audited_at: chrono::Utc::now(),
            scores,
            technical,
            onpage: analysis.onpage,
            content: analysis.content,
            issues,
            backlinks: enriched.backlinks,
            local_seo: analysis.local,
            keyword_rankings: enriched.rankings,
            performance_status,
        };

        tracing::info!(
            "Audit of {} complete: overall {} (technical {}, on-page {}, content {}), {} issues",
            domain,
            result.scores.overall,
            result.scores.technical,
            result.scores.onpage,
            result.scores.content,
            result.issues.len()
        );

        let enrichment = match (&self.store, record_id) {
            (Some(store), Some(id)) => {
                persist(store, id, &result)?;
                match (&self.performance, performance_missed) {
                    (Some(source), true) => {
                        tracing::info!("Retrying performance metrics for {} in the background", domain);
                        Some(EnrichmentTask::spawn_performance(PerformanceRetry {
                            source: Arc::clone(source),
                            store: Arc::clone(store),
                            record_id: id,
                            url: result.url.clone(),
                            timeout: Duration::from_secs(
                                self.settings.background_performance_timeout_secs,
                            ),
                        }))
                    }
                    _ => None,
                }
            }
            _ => None,
        };

        Ok(AuditRun {
            result,
            record_id,
            enrichment,
        })
    }

    /// Runs every configured enrichment source concurrently until done or
    /// until the deadline, keeping whatever finished
    async fn enrich(
        &self,
        domain: &str,
        page_url: &str,
        keywords: &[String],
        deadline: Instant,
    ) -> Enrichment {
        let mut performance = match self.performance {
            Some(_) => PerformanceOutcome::Missed,
            None => PerformanceOutcome::Unconfigured,
        };
        let mut backlinks = None;
        let mut rankings = Vec::new();

        let work = async {
            tokio::join!(
                async {
                    if let Some(source) = self.performance.as_deref() {
                        if let Some(metrics) = self.measure(source, page_url).await {
                            performance = PerformanceOutcome::Measured(metrics);
                        }
                    }
                },
                async {
                    if !self.backlinks.is_empty() {
                        let data = self.backlinks.get_backlinks(domain).await;
                        if !data.is_no_data() {
                            backlinks = Some(data);
                        }
                    }
                },
                async {
                    rankings = self.rank_keywords(domain, keywords).await;
                },
            )
        };

        if tokio::time::timeout_at(deadline, work).await.is_err() {
            tracing::warn!(
                "Audit deadline reached for {}, keeping the enrichment gathered so far",
                domain
            );
        }

        Enrichment {
            performance,
            backlinks,
            rankings,
        }
    }

    async fn measure(&self, source: &dyn PerformanceSource, url: &str) -> Option<PerformanceMetrics> {
        let timeout = Duration::from_secs(self.settings.performance_timeout_secs);
        match tokio::time::timeout(timeout, source.measure(url)).await {
            Ok(Ok(metrics)) => Some(metrics),
            Ok(Err(e)) => {
                tracing::warn!("Performance metrics unavailable for {}: {}", url, e);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "Performance metrics for {} timed out after {}s",
                    url,
                    timeout.as_secs()
                );
                None
            }
        }
    }

    async fn rank_keywords(&self, domain: &str, keywords: &[String]) -> Vec<KeywordRanking> {
        if keywords.is_empty() || !self.tracker.is_configured() {
            return Vec::new();
        }

        let location = self.settings.ranking_location.as_deref();
        let lookups = keywords
            .iter()
            .map(|keyword| self.tracker.get_ranking(keyword, domain, location));

        join_all(lookups)
            .await
            .into_iter()
            .zip(keywords)
            .filter_map(|(outcome, keyword)| match outcome {
                Ok(ranking) => Some(ranking),
                Err(e) => {
                    tracing::warn!("Ranking lookup for '{}' failed: {}", keyword, e);
                    None
                }
            })
            .collect()
    }

    /// True when another domain already stored identical body text
    fn is_duplicate(&self, domain: &str, content: &ContentSignals) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        if content.word_count == 0 {
            return false;
        }

        match with_store(store, |s| s.find_duplicate_content(&content.content_hash, domain)) {
            Ok(duplicate) => {
                if duplicate {
                    tracing::info!("Content of {} duplicates another audited domain", domain);
                }
                duplicate
            }
            Err(e) => {
                tracing::warn!("Duplicate content lookup failed for {}: {}", domain, e);
                false
            }
        }
    }

    fn advance(&self, record_id: Option<i64>, state: AuditState) -> Result<()> {
        if let (Some(store), Some(id)) = (&self.store, record_id) {
            with_store(store, |s| s.update_state(id, state))?;
        }
        tracing::debug!("Audit state: {}", state);
        Ok(())
    }

    fn record_failure(&self, id: i64, error: &AuditError) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = with_store(store, |s| s.mark_failed(id, &error.to_string())) {
            tracing::error!("Failed to mark audit {} as failed: {}", id, e);
        }
    }
}

/// Writes a completed result: record, issues, then verified backlinks
fn persist(store: &SharedStore, id: i64, result: &AuditResult) -> Result<()> {
    with_store(store, |s| {
        s.update_audit_record(id, result)?;
        s.append_issues(id, &result.issues)?;
        if let Some(backlinks) = &result.backlinks {
            s.save_backlinks(id, backlinks)?;
        }
        Ok(())
    })?;
    Ok(())
}
