//! Database schema definitions and migrations
//!
//! This module contains all SQL schema definitions for the audit database.
//! Signal sets are stored as JSON columns, one column per block, so late
//! enrichment can rewrite one block without touching the others.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per audit run
CREATE TABLE IF NOT EXISTS audits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    domain TEXT NOT NULL,
    state TEXT NOT NULL,
    url TEXT,
    created_at TEXT NOT NULL,
    audited_at TEXT,
    completed_at TEXT,
    overall_score INTEGER,
    technical_score INTEGER,
    onpage_score INTEGER,
    content_score INTEGER,
    competitor_score INTEGER,
    technical_json TEXT,
    onpage_json TEXT,
    content_json TEXT,
    local_seo_json TEXT,
    keyword_rankings_json TEXT,
    performance_status TEXT,
    content_hash TEXT,
    error_message TEXT
);

CREATE INDEX IF NOT EXISTS idx_audits_domain ON audits(domain);
CREATE INDEX IF NOT EXISTS idx_audits_content_hash ON audits(content_hash);

-- Ordered issue list per audit
CREATE TABLE IF NOT EXISTS issues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    audit_id INTEGER NOT NULL REFERENCES audits(id),
    position INTEGER NOT NULL,
    category TEXT NOT NULL,
    severity TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    fix_suggestion TEXT NOT NULL,
    page_url TEXT,
    UNIQUE(audit_id, position)
);

CREATE INDEX IF NOT EXISTS idx_issues_audit ON issues(audit_id);

-- Verified backlink data; the no-data sentinel is never stored
CREATE TABLE IF NOT EXISTS backlinks (
    audit_id INTEGER PRIMARY KEY REFERENCES audits(id),
    total_count INTEGER NOT NULL,
    domain_count INTEGER NOT NULL,
    anchor_text_json TEXT NOT NULL,
    source TEXT,
    last_checked TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
