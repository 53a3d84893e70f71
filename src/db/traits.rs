// Database trait: async interface for all store operations.
//
// Implementor: SqliteDatabase (wraps rusqlite). Methods are async so a
// synchronous backend behind a Mutex and a native async backend fit the same
// interface. The trait mirrors the free functions in queries.rs.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{ArticleRecord, LabelCounts, NewArticle, ScoreRecord, ScoredArticle};
use crate::engine::polarity::PolarityLabel;

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Run state ---

    /// Get a run state value by key (e.g., "last_batch_at").
    async fn get_run_state(&self, key: &str) -> Result<Option<String>>;

    /// Set a run state value (upsert).
    async fn set_run_state(&self, key: &str, value: &str) -> Result<()>;

    // --- Articles ---

    /// Insert an article, returning its id, or `None` for a duplicate link.
    async fn insert_article(&self, article: &NewArticle) -> Result<Option<i64>>;

    /// Stored articles in insertion order.
    async fn get_articles(&self, only_unscored: bool) -> Result<Vec<ArticleRecord>>;

    async fn article_count(&self) -> Result<i64>;

    // --- Scores ---

    /// Persist a chunk of scores atomically.
    async fn save_scores(&self, records: &[ScoreRecord]) -> Result<usize>;

    /// Strongest articles for a keyword on one side of the axis.
    async fn get_ranked(
        &self,
        keyword: &str,
        label: PolarityLabel,
        limit: u32,
    ) -> Result<Vec<ScoredArticle>>;

    /// Every article joined with its score, if any.
    async fn get_scored_articles(&self) -> Result<Vec<ScoredArticle>>;

    async fn label_counts(&self) -> Result<LabelCounts>;
}
