//! Detached enrichment that outlives the foreground audit

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::enrichment::PerformanceSource;
use crate::issues::{generate_performance_issues, sort_issues};
use crate::model::{PerformanceStatus, TechnicalSignals};
use crate::storage::{with_store, SharedStore};

/// Handle to a background performance attempt
///
/// Dropping the handle detaches the task; it keeps running until it merges,
/// fails, times out or is cancelled.
#[derive(Debug)]
pub struct EnrichmentTask {
    handle: JoinHandle<Option<TechnicalSignals>>,
    cancel: CancellationToken,
}

/// What the background attempt needs to reach the stored record
pub(crate) struct PerformanceRetry {
    pub source: Arc<dyn PerformanceSource>,
    pub store: SharedStore,
    pub record_id: i64,
    pub url: String,
    pub timeout: Duration,
}

impl EnrichmentTask {
    /// Spawns a performance measurement that merges into the stored record
    /// on success
    pub(crate) fn spawn_performance(retry: PerformanceRetry) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Background performance attempt for audit {} cancelled", retry.record_id);
                    None
                }
                merged = run_performance_retry(&retry) => merged,
            }
        });

        Self { handle, cancel }
    }

    /// Asks the task to stop; a merge already in progress still completes
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task and returns the merged technical signals, if any
    pub async fn wait(self) -> Option<TechnicalSignals> {
        match self.handle.await {
            Ok(merged) => merged,
            Err(e) => {
                tracing::warn!("Background enrichment task ended abnormally: {}", e);
                None
            }
        }
    }
}

async fn run_performance_retry(retry: &PerformanceRetry) -> Option<TechnicalSignals> {
    let id = retry.record_id;

    let metrics = match tokio::time::timeout(retry.timeout, retry.source.measure(&retry.url)).await
    {
        Ok(Ok(metrics)) => metrics,
        Ok(Err(e)) => {
            tracing::warn!("Background performance attempt for {} failed: {}", retry.url, e);
            mark_unavailable(retry);
            return None;
        }
        Err(_) => {
            tracing::warn!(
                "Background performance attempt for {} timed out after {}s",
                retry.url,
                retry.timeout.as_secs()
            );
            mark_unavailable(retry);
            return None;
        }
    };

    let merged = with_store(&retry.store, |store| {
        let technical = store.merge_technical_metrics(id, &metrics)?;
        let mut issues = store.get_issues(id)?;
        issues.extend(generate_performance_issues(&technical, &retry.url));
        sort_issues(&mut issues);
        store.replace_issues(id, &issues)?;
        Ok(technical)
    });

    match merged {
        Ok(technical) => {
            tracing::info!("Merged late performance metrics into audit {}", id);
            Some(technical)
        }
        Err(e) => {
            tracing::error!("Failed to merge performance metrics into audit {}: {}", id, e);
            None
        }
    }
}

fn mark_unavailable(retry: &PerformanceRetry) {
    if let Err(e) = with_store(&retry.store, |store| {
        store.set_performance_status(retry.record_id, PerformanceStatus::Unavailable)
    }) {
        tracing::warn!(
            "Failed to record performance status for audit {}: {}",
            retry.record_id,
            e
        );
    }
}
