// Database queries: CRUD operations for all tables.
//
// Every SQL statement lives here; the rest of the crate goes through these
// functions or the `Database` trait that wraps them.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{
    ArticleRecord, LabelCounts, NewArticle, ScoreRecord, ScoredArticle, StoredScore,
};
use crate::engine::polarity::PolarityLabel;

// --- Run state ---

pub fn get_run_state(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM run_state WHERE key = ?1")?;
    let result = stmt.query_row(params![key], |row| row.get(0)).optional()?;
    Ok(result)
}

/// Set a run state value (upsert).
pub fn set_run_state(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO run_state (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

// --- Articles ---

/// Insert an article. Returns `None` when the link is already stored.
pub fn insert_article(conn: &Connection, article: &NewArticle) -> Result<Option<i64>> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO articles (category, title, link, description, keyword)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            article.category,
            article.title,
            article.link,
            article.description,
            article.keyword,
        ],
    )?;
    Ok((inserted > 0).then(|| conn.last_insert_rowid()))
}

const ARTICLE_COLUMNS: &str =
    "a.id, a.category, a.title, a.link, a.description, a.keyword, a.created_at";

const SCORE_COLUMNS: &str = "s.keyword, s.target_similarity, s.opposite_similarity, \
     s.bias_score, s.label, s.resolved_subject, s.unscoreable_reason, s.threshold, s.scored_at";

fn article_from_row(row: &Row<'_>) -> rusqlite::Result<ArticleRecord> {
    Ok(ArticleRecord {
        id: row.get(0)?,
        category: row.get(1)?,
        title: row.get(2)?,
        link: row.get(3)?,
        description: row.get(4)?,
        keyword: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Read score columns starting at index 7. `None` when the LEFT JOIN missed.
fn score_from_row(row: &Row<'_>) -> rusqlite::Result<Option<StoredScore>> {
    let keyword: Option<String> = row.get(7)?;
    let Some(keyword) = keyword else {
        return Ok(None);
    };
    let label: Option<String> = row.get(11)?;
    Ok(Some(StoredScore {
        keyword,
        target_similarity: row.get(8)?,
        opposite_similarity: row.get(9)?,
        bias_score: row.get(10)?,
        label: label.as_deref().and_then(PolarityLabel::parse),
        resolved_subject: row.get(12)?,
        unscoreable_reason: row.get(13)?,
        threshold: row.get(14)?,
        scored_at: row.get(15)?,
    }))
}

fn scored_article_from_row(row: &Row<'_>) -> rusqlite::Result<ScoredArticle> {
    Ok(ScoredArticle {
        article: article_from_row(row)?,
        score: score_from_row(row)?,
    })
}

/// List stored articles in insertion order, optionally only those without a score.
pub fn get_articles(conn: &Connection, only_unscored: bool) -> Result<Vec<ArticleRecord>> {
    let sql = if only_unscored {
        format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles a
             LEFT JOIN article_scores s ON s.article_id = a.id
             WHERE s.article_id IS NULL
             ORDER BY a.id"
        )
    } else {
        format!("SELECT {ARTICLE_COLUMNS} FROM articles a ORDER BY a.id")
    };

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], article_from_row)?;

    let mut articles = Vec::new();
    for row in rows {
        articles.push(row?);
    }
    Ok(articles)
}

pub fn article_count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
    Ok(count)
}

// --- Scores ---

/// Write a chunk of score records in one transaction. Existing scores for the
/// same articles are replaced.
pub fn save_scores(conn: &mut Connection, records: &[ScoreRecord]) -> Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO article_scores (article_id, keyword, target_similarity,
                opposite_similarity, bias_score, label, resolved_subject,
                unscoreable_reason, threshold, scored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'))
             ON CONFLICT(article_id) DO UPDATE SET
                keyword = ?2,
                target_similarity = ?3,
                opposite_similarity = ?4,
                bias_score = ?5,
                label = ?6,
                resolved_subject = ?7,
                unscoreable_reason = ?8,
                threshold = ?9,
                scored_at = datetime('now')",
        )?;
        for r in records {
            stmt.execute(params![
                r.article_id,
                r.keyword,
                r.target_similarity,
                r.opposite_similarity,
                r.bias_score,
                r.label.map(|l| l.as_str()),
                r.resolved_subject,
                r.unscoreable_reason,
                r.threshold,
            ])?;
        }
    }
    tx.commit()?;
    Ok(records.len())
}

/// Scored articles for one keyword and label, strongest first.
///
/// TARGET ranks by highest bias, OPPOSITE by lowest, NEUTRAL by closest to zero.
pub fn get_ranked(
    conn: &Connection,
    keyword: &str,
    label: PolarityLabel,
    limit: u32,
) -> Result<Vec<ScoredArticle>> {
    let order = match label {
        PolarityLabel::Target => "s.bias_score DESC",
        PolarityLabel::Opposite => "s.bias_score ASC",
        PolarityLabel::Neutral => "ABS(s.bias_score) ASC",
    };
    let sql = format!(
        "SELECT {ARTICLE_COLUMNS}, {SCORE_COLUMNS}
         FROM article_scores s
         JOIN articles a ON a.id = s.article_id
         WHERE s.keyword = ?1 AND s.label = ?2
         ORDER BY {order}, a.id
         LIMIT ?3"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![keyword, label.as_str(), limit],
        scored_article_from_row,
    )?;

    let mut ranked = Vec::new();
    for row in rows {
        ranked.push(row?);
    }
    Ok(ranked)
}

/// Every stored article with its score (if any), in insertion order.
pub fn get_scored_articles(conn: &Connection) -> Result<Vec<ScoredArticle>> {
    let sql = format!(
        "SELECT {ARTICLE_COLUMNS}, {SCORE_COLUMNS}
         FROM articles a
         LEFT JOIN article_scores s ON s.article_id = a.id
         ORDER BY a.id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], scored_article_from_row)?;

    let mut all = Vec::new();
    for row in rows {
        all.push(row?);
    }
    Ok(all)
}

pub fn label_counts(conn: &Connection) -> Result<LabelCounts> {
    let counts = conn.query_row(
        "SELECT
            COALESCE(SUM(s.label = 'TARGET'), 0),
            COALESCE(SUM(s.label = 'OPPOSITE'), 0),
            COALESCE(SUM(s.label = 'NEUTRAL'), 0),
            COALESCE(SUM(s.article_id IS NOT NULL AND s.label IS NULL), 0),
            COALESCE(SUM(s.article_id IS NULL), 0)
         FROM articles a
         LEFT JOIN article_scores s ON s.article_id = a.id",
        [],
        |row| {
            Ok(LabelCounts {
                target: row.get(0)?,
                opposite: row.get(1)?,
                neutral: row.get(2)?,
                unscoreable: row.get(3)?,
                unscored: row.get(4)?,
            })
        },
    )?;
    Ok(counts)
}
