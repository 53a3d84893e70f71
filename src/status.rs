// System status display: DB stats, label breakdown, last batch time, and
// whether the model and keyword table are where the config says.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::output::terminal;
use crate::pipeline::batch::LAST_BATCH_KEY;

/// Display system status to the terminal.
pub async fn show(db: Option<&Arc<dyn Database>>, config: &Config) -> Result<()> {
    show_file("Model", &config.model_path);
    show_file("Keywords", &config.keywords_path);
    println!("Threshold: ±{}", config.threshold);

    let Some(db) = db else {
        println!("Database: not initialized");
        println!("\nRun `slant init` to set up the database.");
        return Ok(());
    };

    let file_size = std::fs::metadata(&config.db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", config.db_path, file_size);

    println!("Stored articles: {}", db.article_count().await?);

    let counts = db.label_counts().await?;
    terminal::display_label_counts(&counts);

    match db.get_run_state(LAST_BATCH_KEY).await? {
        Some(at) => println!("Last batch: {at}"),
        None => {
            println!("Last batch: never");
            if counts.unscored > 0 {
                println!("  Run `slant batch` to score stored articles");
            }
        }
    }

    Ok(())
}

fn show_file(what: &str, path: &Path) {
    let state = match std::fs::metadata(path) {
        Ok(m) => format_bytes(m.len()),
        Err(_) => "missing".to_string(),
    };
    println!("{what}: {} ({state})", path.display());
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::StopWords;

    #[tokio::test]
    async fn shows_status_for_an_initialized_store() {
        let db = crate::db::in_memory().unwrap();
        let config = Config {
            model_path: "missing-vectors.txt".into(),
            keywords_path: "missing-keywords.csv".into(),
            db_path: ":memory:".to_string(),
            threshold: 0.03,
            commit_chunk: 100,
            concurrency: 4,
            stop_words: StopWords::English,
        };
        show(Some(&db), &config).await.unwrap();
        show(None, &config).await.unwrap();
    }

    #[test]
    fn formats_byte_sizes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
