//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the DocumentStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::{
    ArticleRecord, LinkRecord, RunKind, RunRecord, RunTotals, StoredLink, NAIVE_FORMAT,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite document store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
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
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn format_naive(value: &Option<NaiveDateTime>) -> Option<String> {
    value.map(|d| d.format(NAIVE_FORMAT).to_string())
}

fn parse_naive(value: Option<String>) -> Option<NaiveDateTime> {
    value.and_then(|s| NaiveDateTime::parse_from_str(&s, NAIVE_FORMAT).ok())
}

fn parse_utc(value: &str) -> StorageResult<DateTime<Utc>> {
    value
        .parse::<DateTime<Utc>>()
        .map_err(|e| StorageError::Serialization(format!("bad timestamp '{}': {}", value, e)))
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    let kind: String = row.get(1)?;
    let finished_at: Option<String> = row.get(3)?;
    let total: Option<i64> = row.get(5)?;

    let totals = match (&finished_at, total) {
        (Some(_), Some(total)) => Some(RunTotals {
            total: total as u64,
            succeeded: row.get::<_, Option<i64>>(6)?.unwrap_or(0) as u64,
            failed: row.get::<_, Option<i64>>(7)?.unwrap_or(0) as u64,
            elapsed_ms: row.get::<_, Option<i64>>(8)?.unwrap_or(0) as u64,
            statuses_json: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        }),
        _ => None,
    };

    Ok(RunRecord {
        id: row.get(0)?,
        kind: RunKind::from_db_string(&kind).unwrap_or(RunKind::Crawl),
        started_at: row.get(2)?,
        finished_at,
        config_hash: row.get(4)?,
        totals,
    })
}

impl DocumentStore for SqliteStore {
    // ===== Links =====

    fn bulk_insert_links(&mut self, links: &[LinkRecord]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO links (url, title, source, published_at, extracted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for link in links {
                stmt.execute(params![
                    link.url,
                    link.title,
                    link.source,
                    format_naive(&link.published_at),
                    link.extracted_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;

        Ok(links.len())
    }

    fn list_links(&self) -> StorageResult<Vec<StoredLink>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, url, title FROM links ORDER BY id")?;

        let links = stmt
            .query_map([], |row| {
                Ok(StoredLink {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    title: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    fn delete_link(&mut self, id: i64) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM links WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn count_links(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn pending_links(&self, limit: usize) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.url FROM links l
             LEFT JOIN articles a ON a.url = l.url
             WHERE a.id IS NULL
             GROUP BY l.url
             ORDER BY MIN(l.id)
             LIMIT ?1",
        )?;

        let urls = stmt
            .query_map(params![limit as i64], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(urls)
    }

    // ===== Articles =====

    fn save_article(&mut self, article: &ArticleRecord) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO articles (url, title, subtitle, author, content, publication_date, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                article.url,
                article.title,
                article.subtitle,
                article.author,
                article.content,
                format_naive(&article.publication_date),
                article.scraped_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_article_by_url(&self, url: &str) -> StorageResult<Option<ArticleRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT url, title, subtitle, author, content, publication_date, scraped_at
                 FROM articles WHERE url = ?1 ORDER BY id LIMIT 1",
                params![url],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Option<String>>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((url, title, subtitle, author, content, publication_date, scraped_at)) => {
                Ok(Some(ArticleRecord {
                    url,
                    title,
                    subtitle,
                    author,
                    content,
                    publication_date: parse_naive(publication_date),
                    scraped_at: parse_utc(&scraped_at)?,
                }))
            }
            None => Ok(None),
        }
    }

    fn count_articles(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Maintenance =====

    fn remove_duplicate_links(&mut self) -> StorageResult<u64> {
        let removed = self.conn.execute(
            "DELETE FROM links WHERE id NOT IN (SELECT MIN(id) FROM links GROUP BY url)",
            [],
        )?;
        Ok(removed as u64)
    }

    fn remove_duplicate_articles(&mut self) -> StorageResult<u64> {
        let removed = self.conn.execute(
            "DELETE FROM articles WHERE id NOT IN (SELECT MIN(id) FROM articles GROUP BY url)",
            [],
        )?;
        Ok(removed as u64)
    }

    // ===== Runs =====

    fn create_run(&mut self, kind: RunKind, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (kind, started_at, config_hash) VALUES (?1, ?2, ?3)",
            params![kind.to_db_string(), now, config_hash],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET finished_at = ?1, total = ?2, succeeded = ?3, failed = ?4,
             elapsed_ms = ?5, statuses = ?6 WHERE id = ?7",
            params![
                now,
                totals.total as i64,
                totals.succeeded as i64,
                totals.failed as i64,
                totals.elapsed_ms as i64,
                totals.statuses_json,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn latest_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, started_at, finished_at, config_hash, total, succeeded, failed,
             elapsed_ms, statuses FROM runs ORDER BY id DESC LIMIT ?1",
        )?;

        let runs = stmt
            .query_map(params![limit as i64], run_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(runs)
    }
}
