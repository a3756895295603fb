//! Storage traits and error types
//!
//! This module defines the trait interface for audit persistence backends and
//! associated error types.

use crate::model::{BacklinkData, Issue, PerformanceMetrics, PerformanceStatus, TechnicalSignals};
use crate::state::AuditState;
use crate::storage::AuditRecord;
use crate::AuditResult;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Audit not found: {0}")]
    AuditNotFound(i64),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition { from: AuditState, to: AuditState },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for audit persistence backends
///
/// Implementations are used behind `Arc<Mutex<..>>`, so every call runs with
/// exclusive access to the backend.
pub trait AuditStore {
    // ===== Record Lifecycle =====

    /// Creates a record for a new audit in the `fetching` state
    ///
    /// # Returns
    ///
    /// The ID of the newly created record
    fn create_audit_record(&mut self, domain: &str) -> StorageResult<i64>;

    /// Moves a record to a new pipeline state
    fn update_state(&mut self, id: i64, state: AuditState) -> StorageResult<()>;

    /// Writes the assembled result and marks the record completed
    ///
    /// Issues and backlinks are stored separately with [`append_issues`] and
    /// [`save_backlinks`].
    ///
    /// [`append_issues`]: AuditStore::append_issues
    /// [`save_backlinks`]: AuditStore::save_backlinks
    fn update_audit_record(&mut self, id: i64, result: &AuditResult) -> StorageResult<()>;

    /// Appends issues after any already stored for the record
    fn append_issues(&mut self, id: i64, issues: &[Issue]) -> StorageResult<()>;

    /// Replaces the whole stored issue list of a record
    fn replace_issues(&mut self, id: i64, issues: &[Issue]) -> StorageResult<()>;

    /// Marks a record failed with a reason
    fn mark_failed(&mut self, id: i64, message: &str) -> StorageResult<()>;

    // ===== Enrichment =====

    /// Merges late performance metrics into the stored technical block
    ///
    /// The read-modify-write runs in one transaction and also refreshes the
    /// technical and overall scores.
    ///
    /// # Returns
    ///
    /// The technical signals as stored after the merge
    fn merge_technical_metrics(
        &mut self,
        id: i64,
        metrics: &PerformanceMetrics,
    ) -> StorageResult<TechnicalSignals>;

    /// Records how a background performance attempt ended without a merge
    fn set_performance_status(&mut self, id: i64, status: PerformanceStatus) -> StorageResult<()>;

    /// Stores backlink data for a record
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The data was stored
    /// * `Ok(false)` - The data was the no-data sentinel and was not stored
    fn save_backlinks(&mut self, id: i64, data: &BacklinkData) -> StorageResult<bool>;

    // ===== Queries =====

    /// Gets a record by ID
    fn get_audit(&self, id: i64) -> StorageResult<AuditRecord>;

    /// Gets the stored issues of a record, in order
    fn get_issues(&self, id: i64) -> StorageResult<Vec<Issue>>;

    /// Returns true if another domain already has content with this hash
    fn find_duplicate_content(&self, content_hash: &str, domain: &str) -> StorageResult<bool>;
}
