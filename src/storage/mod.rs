//! Storage module for persisting audits
//!
//! This module handles all database operations for audits, including:
//! - SQLite database initialization and schema management
//! - Audit record lifecycle (created, completed, failed)
//! - Issue lists and backlink data
//! - Late merge of background performance metrics
//! - Duplicate content lookups

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{AuditStore, StorageError, StorageResult};

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::state::AuditState;
use crate::AuditResult;

/// A store shared between an audit and its background enrichment
pub type SharedStore = Arc<Mutex<dyn AuditStore + Send>>;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::new(path)
}

/// Wraps a store for sharing across tasks
pub fn shared<S: AuditStore + Send + 'static>(store: S) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Runs `f` with exclusive access to a shared store
pub fn with_store<T>(
    store: &SharedStore,
    f: impl FnOnce(&mut (dyn AuditStore + Send)) -> StorageResult<T>,
) -> StorageResult<T> {
    let mut guard = store.lock().map_err(|_| StorageError::LockPoisoned)?;
    f(&mut *guard)
}

/// Represents an audit in the database
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub id: i64,
    pub domain: String,
    pub state: AuditState,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub error_message: Option<String>,
    /// Present once the audit completed
    pub result: Option<AuditResult>,
}
