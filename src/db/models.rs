// Data models: Rust structs that map to database rows.
//
// Kept separate from the queries so the pipeline and output modules can use
// them without depending on rusqlite directly.

use serde::{Deserialize, Serialize};

use crate::engine::polarity::PolarityLabel;
use crate::engine::ArticleScore;
use crate::error::Unscoreable;

/// An article about to be inserted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub category: String,
    pub title: String,
    pub link: String,
    pub description: String,
    /// Keyword the article was collected for, when known.
    pub keyword: Option<String>,
}

/// A stored article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: i64,
    pub category: String,
    pub title: String,
    pub link: String,
    pub description: String,
    pub keyword: Option<String>,
    pub created_at: String,
}

/// One row of `article_scores`, ready to write.
///
/// An unscoreable article keeps NULL numeric columns and a reason code; it is
/// never written as 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub article_id: i64,
    pub keyword: String,
    pub target_similarity: Option<f64>,
    pub opposite_similarity: Option<f64>,
    pub bias_score: Option<f64>,
    pub label: Option<PolarityLabel>,
    pub resolved_subject: Option<String>,
    pub unscoreable_reason: Option<String>,
    pub threshold: f64,
}

impl ScoreRecord {
    pub fn from_outcome(
        article_id: i64,
        keyword: &str,
        outcome: &Result<ArticleScore, Unscoreable>,
        threshold: f64,
    ) -> Self {
        match outcome {
            Ok(score) => Self {
                article_id,
                keyword: keyword.to_string(),
                target_similarity: Some(score.result.target_similarity),
                opposite_similarity: Some(score.result.opposite_similarity),
                bias_score: Some(score.result.bias_score),
                label: Some(score.result.label),
                resolved_subject: Some(score.resolved_subject.clone()),
                unscoreable_reason: None,
                threshold,
            },
            Err(reason) => Self {
                article_id,
                keyword: keyword.to_string(),
                target_similarity: None,
                opposite_similarity: None,
                bias_score: None,
                label: None,
                resolved_subject: None,
                unscoreable_reason: Some(reason.reason_code().to_string()),
                threshold,
            },
        }
    }

    pub fn is_scored(&self) -> bool {
        self.label.is_some()
    }
}

/// A score as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredScore {
    pub keyword: String,
    pub target_similarity: Option<f64>,
    pub opposite_similarity: Option<f64>,
    pub bias_score: Option<f64>,
    pub label: Option<PolarityLabel>,
    pub resolved_subject: Option<String>,
    pub unscoreable_reason: Option<String>,
    pub threshold: f64,
    pub scored_at: String,
}

/// An article joined with its score, if it has one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    pub article: ArticleRecord,
    pub score: Option<StoredScore>,
}

/// How stored articles break down by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub target: i64,
    pub opposite: i64,
    pub neutral: i64,
    pub unscoreable: i64,
    pub unscored: i64,
}

impl LabelCounts {
    pub fn total(&self) -> i64 {
        self.target + self.opposite + self.neutral + self.unscoreable + self.unscored
    }
}
