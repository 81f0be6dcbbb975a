//! SQLite persistence for username searches.
//!
//! Every probe result becomes one `people_searches` row and every run one
//! `search_sessions` row. Nothing is keyed or deduplicated: history only
//! grows.

use crate::domain::model::{
    ProbeReport, SearchSessionRecord, StoredSearch, UsernameSummary,
};
use crate::utils::error::Result;
use rusqlite::{params, Connection, Row};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS people_searches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    platform TEXT,
    url TEXT,
    found BOOLEAN,
    status TEXT,
    additional_info TEXT,
    checked_at TEXT
);

CREATE TABLE IF NOT EXISTS search_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    search_type TEXT,
    query TEXT,
    results_count INTEGER,
    created_at TEXT
);
";

pub const USERNAME_SEARCH_TYPE: &str = "username";

pub struct SearchStore {
    conn: Connection,
}

impl SearchStore {
    /// Opens or creates the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Opens the database at `path` only if it already exists, so read-only
    /// commands never leave an empty file behind.
    pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        if !path.as_ref().is_file() {
            tracing::debug!("No database at {}", path.as_ref().display());
            return Ok(None);
        }
        Self::open(path).map(Some)
    }

    /// In-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Stores one row per result plus the session row, in one transaction.
    /// Returns the session id.
    pub fn save_report(&mut self, report: &ProbeReport) -> Result<i64> {
        let tx = self.conn.transaction()?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO people_searches
                 (username, platform, url, found, status, additional_info, checked_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for result in &report.results {
                insert.execute(params![
                    report.username,
                    result.platform,
                    result.url,
                    result.found(),
                    result.status.as_str(),
                    result.reason,
                    result.checked_at.to_rfc3339(),
                ])?;
            }
        }

        tx.execute(
            "INSERT INTO search_sessions (search_type, query, results_count, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                USERNAME_SEARCH_TYPE,
                report.username,
                report.found_count() as i64,
                report.finished_at.to_rfc3339(),
            ],
        )?;
        let session_id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(
            "Saved {} results for '{}' (session {})",
            report.results.len(),
            report.username,
            session_id
        );
        Ok(session_id)
    }

    /// Most recent sessions first.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SearchSessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, search_type, query, results_count, created_at
             FROM search_sessions ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(SearchSessionRecord {
                id: row.get(0)?,
                search_type: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                query: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                results_count: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
                created_at: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            })
        })?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Every stored probe result, newest first.
    pub fn username_searches(&self) -> Result<Vec<StoredSearch>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, platform, url, found, status, additional_info, checked_at
             FROM people_searches ORDER BY checked_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], row_to_stored_search)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Per username totals, most recently searched first.
    pub fn username_summaries(&self) -> Result<Vec<UsernameSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT username, COUNT(*) AS total,
                    SUM(CASE WHEN found THEN 1 ELSE 0 END) AS found_count
             FROM people_searches
             GROUP BY username
             ORDER BY MAX(checked_at) DESC, username",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(UsernameSummary {
                username: row.get(0)?,
                total: row.get(1)?,
                found_count: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Found profiles for `username`, in insertion order.
    pub fn found_profiles(&self, username: &str) -> Result<Vec<StoredSearch>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, platform, url, found, status, additional_info, checked_at
             FROM people_searches WHERE username = ?1 AND found = 1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![username], row_to_stored_search)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn row_to_stored_search(row: &Row<'_>) -> rusqlite::Result<StoredSearch> {
    Ok(StoredSearch {
        id: row.get(0)?,
        username: row.get(1)?,
        platform: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        url: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        found: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
        status: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        additional_info: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        checked_at: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Category, ProbeResult, ProbeStatus};
    use chrono::{Duration, TimeZone, Utc};

    fn report(username: &str, minute: u32, results: &[(&str, ProbeStatus)]) -> ProbeReport {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap();
        ProbeReport {
            username: username.to_string(),
            category: Category::All,
            results: results
                .iter()
                .enumerate()
                .map(|(i, (platform, status))| ProbeResult {
                    platform: platform.to_string(),
                    url: format!("https://{}.test/{}", platform.to_lowercase(), username),
                    status: *status,
                    http_status: Some(200),
                    failure: None,
                    reason: "test".to_string(),
                    checked_at: at + Duration::seconds(i as i64),
                })
                .collect(),
            interrupted: false,
            started_at: at,
            finished_at: at + Duration::seconds(30),
        }
    }

    #[test]
    fn test_open_existing_does_not_create_database() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("osint.db");

        assert!(SearchStore::open_existing(&path).unwrap().is_none());
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());

        let mut store = SearchStore::open(&path).unwrap();
        store
            .save_report(&report("octocat", 0, &[("GitHub", ProbeStatus::Found)]))
            .unwrap();
        drop(store);

        let reopened = SearchStore::open_existing(&path).unwrap().unwrap();
        assert_eq!(reopened.recent_sessions(5).unwrap().len(), 1);
    }

    #[test]
    fn test_save_report_stores_one_row_per_result() {
        let mut store = SearchStore::in_memory().unwrap();
        store
            .save_report(&report(
                "octocat",
                0,
                &[
                    ("GitHub", ProbeStatus::Found),
                    ("GitLab", ProbeStatus::NotFound),
                    ("Reddit", ProbeStatus::Error),
                ],
            ))
            .unwrap();

        let rows = store.username_searches().unwrap();
        assert_eq!(rows.len(), 3);
        // 最新的在前
        assert_eq!(rows[0].platform, "Reddit");
        assert_eq!(rows[0].status, "error");
        assert!(!rows[0].found);
        assert_eq!(rows[2].platform, "GitHub");
        assert!(rows[2].found);
        assert_eq!(rows[2].url, "https://github.test/octocat");
    }

    #[test]
    fn test_history_accumulates() {
        let mut store = SearchStore::in_memory().unwrap();
        let r = report("octocat", 0, &[("GitHub", ProbeStatus::Found)]);
        store.save_report(&r).unwrap();
        store.save_report(&r).unwrap();

        assert_eq!(store.username_searches().unwrap().len(), 2);
        assert_eq!(store.recent_sessions(10).unwrap().len(), 2);
    }

    #[test]
    fn test_recent_sessions_newest_first_and_limited() {
        let mut store = SearchStore::in_memory().unwrap();
        store
            .save_report(&report("alice", 0, &[("GitHub", ProbeStatus::Found)]))
            .unwrap();
        store
            .save_report(&report("bob", 5, &[("GitHub", ProbeStatus::NotFound)]))
            .unwrap();
        store
            .save_report(&report("carol", 10, &[("GitHub", ProbeStatus::Found)]))
            .unwrap();

        let sessions = store.recent_sessions(2).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].query, "carol");
        assert_eq!(sessions[0].search_type, USERNAME_SEARCH_TYPE);
        assert_eq!(sessions[0].results_count, 1);
        assert_eq!(sessions[1].query, "bob");
        assert_eq!(sessions[1].results_count, 0);
    }

    #[test]
    fn test_summaries_and_found_profiles() {
        let mut store = SearchStore::in_memory().unwrap();
        store
            .save_report(&report(
                "alice",
                0,
                &[
                    ("GitHub", ProbeStatus::Found),
                    ("GitLab", ProbeStatus::NotFound),
                    ("Steam", ProbeStatus::Found),
                ],
            ))
            .unwrap();
        store
            .save_report(&report("bob", 5, &[("GitHub", ProbeStatus::NotFound)]))
            .unwrap();

        let summaries = store.username_summaries().unwrap();
        assert_eq!(
            summaries,
            vec![
                UsernameSummary {
                    username: "bob".to_string(),
                    total: 1,
                    found_count: 0
                },
                UsernameSummary {
                    username: "alice".to_string(),
                    total: 3,
                    found_count: 2
                },
            ]
        );

        let found: Vec<String> = store
            .found_profiles("alice")
            .unwrap()
            .into_iter()
            .map(|r| r.platform)
            .collect();
        assert_eq!(found, vec!["GitHub", "Steam"]);
        assert!(store.found_profiles("bob").unwrap().is_empty());
    }

    #[test]
    fn test_open_creates_database_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("data/osint.db");

        {
            let mut store = SearchStore::open(&path).unwrap();
            store
                .save_report(&report("alice", 0, &[("GitHub", ProbeStatus::Found)]))
                .unwrap();
        }

        assert!(path.exists());
        let reopened = SearchStore::open(&path).unwrap();
        assert_eq!(reopened.username_searches().unwrap().len(), 1);
    }
}
