// Database schema: table creation and migrations.
//
// A `schema_version` table tracks which migrations have run, and each
// migration is a function that executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet. Idempotent.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Collected news articles, one row per distinct link
        CREATE TABLE IF NOT EXISTS articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL,
            link TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            keyword TEXT,                      -- keyword the article was collected for
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Latest polarity score per article. Numeric columns are NULL when
        -- the article was unscoreable; unscoreable_reason says why.
        CREATE TABLE IF NOT EXISTS article_scores (
            article_id INTEGER PRIMARY KEY REFERENCES articles(id) ON DELETE CASCADE,
            keyword TEXT NOT NULL,             -- axis the article was scored on
            target_similarity REAL,            -- cos(article, keyword anchor)
            opposite_similarity REAL,          -- cos(article, antonym anchor)
            bias_score REAL,                   -- target - opposite
            label TEXT,                        -- TARGET / OPPOSITE / NEUTRAL
            resolved_subject TEXT,
            unscoreable_reason TEXT,
            threshold REAL NOT NULL,
            scored_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Run state: last batch time and similar bookkeeping
        CREATE TABLE IF NOT EXISTS run_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_scores_keyword_label
            ON article_scores(keyword, label);
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // v2: lookups of articles by collection keyword
    run_migration(conn, 2, |c| {
        c.execute_batch("CREATE INDEX IF NOT EXISTS idx_articles_keyword ON articles(keyword);")
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count user tables (shown by `slant init`).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
