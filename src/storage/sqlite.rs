//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the AuditStore trait.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::model::{
    AnchorText, BacklinkData, Issue, IssueCategory, PerformanceMetrics, PerformanceStatus,
    Scores, Severity, TechnicalSignals,
};
use crate::scoring::{overall_score, technical_score};
use crate::state::AuditState;
use crate::storage::traits::{AuditStore, StorageError, StorageResult};
use crate::storage::AuditRecord;
use crate::url::site_domain;
use crate::AuditResult;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

/// Raw column values of one `audits` row
struct AuditRow {
    id: i64,
    domain: String,
    state: String,
    url: Option<String>,
    created_at: String,
    audited_at: Option<String>,
    completed_at: Option<String>,
    scores: Option<Scores>,
    technical_json: Option<String>,
    onpage_json: Option<String>,
    content_json: Option<String>,
    local_seo_json: Option<String>,
    keyword_rankings_json: Option<String>,
    performance_status: Option<String>,
    error_message: Option<String>,
}

impl SqliteStore {
    /// Opens or creates an audit database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        crate::storage::schema::initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        crate::storage::schema::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn current_state(&self, id: i64) -> StorageResult<AuditState> {
        let state: Option<String> = self
            .conn
            .query_row(
                "SELECT state FROM audits WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        let state = state.ok_or(StorageError::AuditNotFound(id))?;
        AuditState::from_db_string(&state)
            .ok_or_else(|| StorageError::Database(format!("unknown audit state '{}'", state)))
    }

    fn get_backlinks(&self, id: i64) -> StorageResult<Option<BacklinkData>> {
        let row: Option<(u64, u64, String, Option<String>, String)> = self
            .conn
            .query_row(
                "SELECT total_count, domain_count, anchor_text_json, source, last_checked
                 FROM backlinks WHERE audit_id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)? as u64,
                        row.get::<_, i64>(1)? as u64,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((total_count, domain_count, anchors, source, last_checked)) = row else {
            return Ok(None);
        };

        Ok(Some(BacklinkData {
            total_count,
            domain_count,
            anchor_text: serde_json::from_str::<Vec<AnchorText>>(&anchors)?,
            last_checked: parse_timestamp(&last_checked)?,
            source,
        }))
    }

    fn build_result(&self, row: &AuditRow) -> StorageResult<Option<AuditResult>> {
        let (Some(technical), Some(onpage), Some(content), Some(scores)) = (
            &row.technical_json,
            &row.onpage_json,
            &row.content_json,
            row.scores,
        ) else {
            return Ok(None);
        };

        let performance_status = row
            .performance_status
            .as_deref()
            .and_then(PerformanceStatus::from_db_string)
            .unwrap_or(PerformanceStatus::Unavailable);

        Ok(Some(AuditResult {
            domain: row.domain.clone(),
            url: row.url.clone().unwrap_or_default(),
            audited_at: match &row.audited_at {
                Some(ts) => parse_timestamp(ts)?,
                None => parse_timestamp(&row.created_at)?,
            },
            scores,
            technical: serde_json::from_str(technical)?,
            onpage: serde_json::from_str(onpage)?,
            content: serde_json::from_str(content)?,
            issues: self.get_issues(row.id)?,
            backlinks: self.get_backlinks(row.id)?,
            local_seo: row
                .local_seo_json
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            keyword_rankings: match &row.keyword_rankings_json {
                Some(json) => serde_json::from_str(json)?,
                None => Vec::new(),
            },
            performance_status,
        }))
    }
}

fn parse_timestamp(s: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Serialization(format!("bad timestamp '{}': {}", s, e)))
}

/// Writes issues at consecutive positions starting from `first`
fn insert_issues(
    tx: &rusqlite::Transaction<'_>,
    id: i64,
    first: i64,
    issues: &[Issue],
) -> StorageResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO issues
         (audit_id, position, category, severity, title, description, fix_suggestion, page_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for (offset, issue) in issues.iter().enumerate() {
        stmt.execute(params![
            id,
            first + offset as i64,
            issue.category.to_db_string(),
            issue.severity.to_db_string(),
            issue.title,
            issue.description,
            issue.fix_suggestion,
            issue.page_url,
        ])?;
    }
    Ok(())
}

impl AuditStore for SqliteStore {
    // ===== Record Lifecycle =====

    fn create_audit_record(&mut self, domain: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO audits (domain, state, created_at) VALUES (?1, ?2, ?3)",
            params![domain, AuditState::Fetching.to_db_string(), now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_state(&mut self, id: i64, state: AuditState) -> StorageResult<()> {
        let current = self.current_state(id)?;
        if current == state {
            return Ok(());
        }
        if !current.can_transition_to(state) {
            return Err(StorageError::InvalidTransition {
                from: current,
                to: state,
            });
        }

        self.conn.execute(
            "UPDATE audits SET state = ?1 WHERE id = ?2",
            params![state.to_db_string(), id],
        )?;
        Ok(())
    }

    fn update_audit_record(&mut self, id: i64, result: &AuditResult) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let local_seo = result
            .local_seo
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let updated = self.conn.execute(
            "UPDATE audits SET
                state = ?1, url = ?2, audited_at = ?3, completed_at = ?4,
                overall_score = ?5, technical_score = ?6, onpage_score = ?7,
                content_score = ?8, competitor_score = ?9,
                technical_json = ?10, onpage_json = ?11, content_json = ?12,
                local_seo_json = ?13, keyword_rankings_json = ?14,
                performance_status = ?15, content_hash = ?16
             WHERE id = ?17",
            params![
                AuditState::Completed.to_db_string(),
                result.url,
                result.audited_at.to_rfc3339(),
                now,
                result.scores.overall,
                result.scores.technical,
                result.scores.onpage,
                result.scores.content,
                result.scores.competitor,
                serde_json::to_string(&result.technical)?,
                serde_json::to_string(&result.onpage)?,
                serde_json::to_string(&result.content)?,
                local_seo,
                serde_json::to_string(&result.keyword_rankings)?,
                result.performance_status.to_db_string(),
                result.content.content_hash,
                id,
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::AuditNotFound(id));
        }
        Ok(())
    }

    fn append_issues(&mut self, id: i64, issues: &[Issue]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        let next: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM issues WHERE audit_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        insert_issues(&tx, id, next, issues)?;

        tx.commit()?;
        Ok(())
    }

    fn replace_issues(&mut self, id: i64, issues: &[Issue]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM issues WHERE audit_id = ?1", params![id])?;
        insert_issues(&tx, id, 0, issues)?;

        tx.commit()?;
        Ok(())
    }

    fn mark_failed(&mut self, id: i64, message: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE audits SET state = ?1, error_message = ?2, completed_at = ?3 WHERE id = ?4",
            params![AuditState::Failed.to_db_string(), message, now, id],
        )?;
        if updated == 0 {
            return Err(StorageError::AuditNotFound(id));
        }
        Ok(())
    }

    // ===== Enrichment =====

    fn merge_technical_metrics(
        &mut self,
        id: i64,
        metrics: &PerformanceMetrics,
    ) -> StorageResult<TechnicalSignals> {
        let tx = self.conn.transaction()?;

        let row: Option<(Option<String>, Option<u8>, Option<u8>)> = tx
            .query_row(
                "SELECT technical_json, onpage_score, content_score FROM audits WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let (technical_json, onpage, content) = row.ok_or(StorageError::AuditNotFound(id))?;
        let technical_json = technical_json.ok_or_else(|| {
            StorageError::Database(format!("audit {} has no technical block yet", id))
        })?;

        let mut technical: TechnicalSignals = serde_json::from_str(&technical_json)?;
        technical.apply_metrics(metrics);

        let technical_points = technical_score(&technical);
        let overall = overall_score(
            technical_points,
            onpage.unwrap_or(0),
            content.unwrap_or(0),
        );

        tx.execute(
            "UPDATE audits SET technical_json = ?1, technical_score = ?2, overall_score = ?3,
             performance_status = ?4 WHERE id = ?5",
            params![
                serde_json::to_string(&technical)?,
                technical_points,
                overall,
                PerformanceStatus::Measured.to_db_string(),
                id,
            ],
        )?;
        tx.commit()?;

        Ok(technical)
    }

    fn set_performance_status(&mut self, id: i64, status: PerformanceStatus) -> StorageResult<()> {
        let updated = self.conn.execute(
            "UPDATE audits SET performance_status = ?1 WHERE id = ?2",
            params![status.to_db_string(), id],
        )?;
        if updated == 0 {
            return Err(StorageError::AuditNotFound(id));
        }
        Ok(())
    }

    fn save_backlinks(&mut self, id: i64, data: &BacklinkData) -> StorageResult<bool> {
        if data.is_no_data() {
            tracing::debug!("Not persisting no-data backlink result for audit {}", id);
            return Ok(false);
        }

        self.conn.execute(
            "INSERT OR REPLACE INTO backlinks
             (audit_id, total_count, domain_count, anchor_text_json, source, last_checked)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                data.total_count as i64,
                data.domain_count as i64,
                serde_json::to_string(&data.anchor_text)?,
                data.source,
                data.last_checked.to_rfc3339(),
            ],
        )?;
        Ok(true)
    }

    // ===== Queries =====

    fn get_audit(&self, id: i64) -> StorageResult<AuditRecord> {
        let row = self
            .conn
            .query_row(
                "SELECT id, domain, state, url, created_at, audited_at, completed_at,
                 overall_score, technical_score, onpage_score, content_score, competitor_score,
                 technical_json, onpage_json, content_json, local_seo_json,
                 keyword_rankings_json, performance_status, error_message
                 FROM audits WHERE id = ?1",
                params![id],
                |row| {
                    let overall: Option<u8> = row.get(7)?;
                    let technical: Option<u8> = row.get(8)?;
                    let onpage: Option<u8> = row.get(9)?;
                    let content: Option<u8> = row.get(10)?;
                    let scores = match (overall, technical, onpage, content) {
                        (Some(overall), Some(technical), Some(onpage), Some(content)) => {
                            Some(Scores {
                                overall,
                                technical,
                                onpage,
                                content,
                                competitor: row.get(11)?,
                            })
                        }
                        _ => None,
                    };

                    Ok(AuditRow {
                        id: row.get(0)?,
                        domain: row.get(1)?,
                        state: row.get(2)?,
                        url: row.get(3)?,
                        created_at: row.get(4)?,
                        audited_at: row.get(5)?,
                        completed_at: row.get(6)?,
                        scores,
                        technical_json: row.get(12)?,
                        onpage_json: row.get(13)?,
                        content_json: row.get(14)?,
                        local_seo_json: row.get(15)?,
                        keyword_rankings_json: row.get(16)?,
                        performance_status: row.get(17)?,
                        error_message: row.get(18)?,
                    })
                },
            )
            .optional()?
            .ok_or(StorageError::AuditNotFound(id))?;

        let state = AuditState::from_db_string(&row.state).unwrap_or(AuditState::Failed);
        let result = self.build_result(&row)?;

        Ok(AuditRecord {
            id: row.id,
            domain: row.domain,
            state,
            created_at: row.created_at,
            completed_at: row.completed_at,
            error_message: row.error_message,
            result,
        })
    }

    fn get_issues(&self, id: i64) -> StorageResult<Vec<Issue>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, severity, title, description, fix_suggestion, page_url
             FROM issues WHERE audit_id = ?1 ORDER BY position",
        )?;

        let issues = stmt
            .query_map(params![id], |row| {
                Ok(Issue {
                    category: IssueCategory::from_db_string(&row.get::<_, String>(0)?)
                        .unwrap_or(IssueCategory::Technical),
                    severity: Severity::from_db_string(&row.get::<_, String>(1)?)
                        .unwrap_or(Severity::Info),
                    title: row.get(2)?,
                    description: row.get(3)?,
                    fix_suggestion: row.get(4)?,
                    page_url: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(issues)
    }

    fn find_duplicate_content(&self, content_hash: &str, domain: &str) -> StorageResult<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT domain FROM audits WHERE content_hash = ?1")?;

        let domains = stmt
            .query_map(params![content_hash], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let own_site = site_domain(domain);
        Ok(domains.iter().any(|d| site_domain(d) != own_site))
    }
}
