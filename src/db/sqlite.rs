// SqliteDatabase: rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{ArticleRecord, LabelCounts, NewArticle, ScoreRecord, ScoredArticle};
use super::traits::Database;
use crate::engine::polarity::PolarityLabel;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn get_run_state(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        super::queries::get_run_state(&conn, key)
    }

    async fn set_run_state(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::set_run_state(&conn, key, value)
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<Option<i64>> {
        let conn = self.conn.lock().await;
        super::queries::insert_article(&conn, article)
    }

    async fn get_articles(&self, only_unscored: bool) -> Result<Vec<ArticleRecord>> {
        let conn = self.conn.lock().await;
        super::queries::get_articles(&conn, only_unscored)
    }

    async fn article_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::article_count(&conn)
    }

    async fn save_scores(&self, records: &[ScoreRecord]) -> Result<usize> {
        let mut conn = self.conn.lock().await;
        super::queries::save_scores(&mut conn, records)
    }

    async fn get_ranked(
        &self,
        keyword: &str,
        label: PolarityLabel,
        limit: u32,
    ) -> Result<Vec<ScoredArticle>> {
        let conn = self.conn.lock().await;
        super::queries::get_ranked(&conn, keyword, label, limit)
    }

    async fn get_scored_articles(&self) -> Result<Vec<ScoredArticle>> {
        let conn = self.conn.lock().await;
        super::queries::get_scored_articles(&conn)
    }

    async fn label_counts(&self) -> Result<LabelCounts> {
        let conn = self.conn.lock().await;
        super::queries::label_counts(&conn)
    }
}
