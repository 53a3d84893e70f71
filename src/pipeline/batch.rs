// Batch rescoring pipeline: stored articles -> polarity scores.
//
// 1. Load articles from the store (only unscored ones unless rescoring)
// 2. Resolve each article's keyword: the one it was collected for, or the
//    first configured keyword found in its text
// 3. Score a chunk in parallel on the blocking pool (scoring is CPU-bound)
// 4. Commit the chunk in one transaction, then move to the next
//
// An interrupted run loses at most the chunk in flight. Articles with no
// keyword at all are skipped and stay unscored.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use crate::db::models::{ArticleRecord, ScoreRecord};
use crate::db::Database;
use crate::engine::{ScoringEngine, Subject};

/// Run-state key holding the completion time of the last batch.
pub const LAST_BATCH_KEY: &str = "last_batch_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Rows written per committed transaction.
    pub chunk_size: usize,
    /// Articles scored at once.
    pub concurrency: usize,
    /// Score every stored article, not only unscored ones.
    pub rescore: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            chunk_size: 100,
            concurrency: 4,
            rescore: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub considered: usize,
    pub scored: usize,
    pub unscoreable: usize,
    /// No keyword assigned and none detected in the text.
    pub skipped: usize,
}

/// Score stored articles and persist the results chunk by chunk.
pub async fn run(
    engine: Arc<ScoringEngine>,
    db: &dyn Database,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    let articles = db.get_articles(!options.rescore).await?;
    let mut summary = BatchSummary {
        considered: articles.len(),
        ..BatchSummary::default()
    };

    let chunk_size = options.chunk_size.max(1);
    let concurrency = options.concurrency.max(1);

    info!(
        articles = articles.len(),
        chunk_size,
        concurrency,
        rescore = options.rescore,
        "Starting batch"
    );

    let pb = ProgressBar::new(articles.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar().template("  Scoring [{bar:30}] {pos}/{len} ({eta})")?,
    );

    for (chunk_index, chunk) in articles.chunks(chunk_size).enumerate() {
        let outcomes: Vec<_> = stream::iter(chunk.iter().cloned().map(|article| {
            let engine = Arc::clone(&engine);
            tokio::task::spawn_blocking(move || score_one(&engine, &article))
        }))
        .buffered(concurrency)
        .collect()
        .await;

        let mut records = Vec::with_capacity(chunk.len());
        for outcome in outcomes {
            match outcome.context("Scoring task panicked")? {
                Some(record) if record.is_scored() => {
                    summary.scored += 1;
                    records.push(record);
                }
                Some(record) => {
                    summary.unscoreable += 1;
                    records.push(record);
                }
                None => summary.skipped += 1,
            }
            pb.inc(1);
        }

        db.save_scores(&records).await?;
        debug!(chunk = chunk_index, rows = records.len(), "Committed chunk");
    }

    pb.finish_and_clear();

    db.set_run_state(
        LAST_BATCH_KEY,
        &chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    )
    .await?;

    info!(
        scored = summary.scored,
        unscoreable = summary.unscoreable,
        skipped = summary.skipped,
        "Batch complete"
    );

    Ok(summary)
}

/// Score one stored article. `None` when it has no keyword to score against.
pub fn score_one(engine: &ScoringEngine, article: &ArticleRecord) -> Option<ScoreRecord> {
    let assigned = article
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());
    let keyword = match assigned {
        Some(k) => k.to_string(),
        None => engine
            .detect_subject(&article.title, &article.description)?
            .to_string(),
    };

    let outcome = engine.score_article(
        &article.title,
        &article.description,
        &Subject::keyword(keyword.as_str()),
    );
    if let Err(reason) = &outcome {
        debug!(id = article.id, keyword = %keyword, reason = %reason, "Article unscoreable");
    }

    Some(ScoreRecord::from_outcome(
        article.id,
        &keyword,
        &outcome,
        engine.threshold(),
    ))
}
