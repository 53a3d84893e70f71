// Corpus import and export.
//
// Import reads a CSV of collected news (title, link, and optionally category,
// description, keyword), strips search-API markup and inserts each row.
// Export writes every stored article with its score, one row per link.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::db::models::{NewArticle, ScoredArticle};
use crate::db::Database;
use crate::table::{write_record, CsvTable};
use crate::text::clean_markup;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub read: usize,
    pub inserted: usize,
    pub duplicates: usize,
    /// Rows with no link or no title.
    pub skipped: usize,
}

/// Parse a corpus CSV into articles ready to insert.
///
/// Returns the articles and the number of rows skipped for lacking a link or
/// a title.
pub fn parse_articles(text: &str) -> Result<(Vec<NewArticle>, usize)> {
    let csv = CsvTable::parse(text).context("Malformed corpus CSV")?;

    let title_col = csv.column("title").context("Corpus CSV has no `title` column")?;
    let link_col = csv.column("link").context("Corpus CSV has no `link` column")?;
    let category_col = csv.column("category");
    let description_col = csv.column("description");
    let keyword_col = csv.column("keyword");

    let mut articles = Vec::with_capacity(csv.records.len());
    let mut skipped = 0;

    for record in &csv.records {
        let link = CsvTable::field(record, Some(link_col)).trim();
        let title = clean_markup(CsvTable::field(record, Some(title_col)));
        if link.is_empty() || title.is_empty() {
            debug!(line = record.line, "Skipping row without link or title");
            skipped += 1;
            continue;
        }

        let keyword = CsvTable::field(record, keyword_col).trim();
        articles.push(NewArticle {
            category: CsvTable::field(record, category_col).trim().to_string(),
            title,
            link: link.to_string(),
            description: clean_markup(CsvTable::field(record, description_col)),
            keyword: (!keyword.is_empty()).then(|| keyword.to_string()),
        });
    }

    Ok((articles, skipped))
}

/// Import a corpus CSV file into the store.
pub async fn import_csv(db: &dyn Database, path: &Path) -> Result<ImportSummary> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file {}", path.display()))?;
    let (articles, skipped) = parse_articles(&text)?;

    let mut summary = ImportSummary {
        read: articles.len() + skipped,
        skipped,
        ..ImportSummary::default()
    };

    for article in &articles {
        match db.insert_article(article).await? {
            Some(_) => summary.inserted += 1,
            None => summary.duplicates += 1,
        }
    }

    info!(
        path = %path.display(),
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        skipped = summary.skipped,
        "Corpus imported"
    );
    Ok(summary)
}

const EXPORT_HEADERS: [&str; 13] = [
    "id",
    "category",
    "title",
    "link",
    "description",
    "content",
    "keyword",
    "target_similarity",
    "opposite_similarity",
    "bias_score",
    "label",
    "resolved_subject",
    "unscoreable_reason",
];

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render stored articles as CSV, keeping the first row for each link.
///
/// Unscored values are empty cells, never zeros.
pub fn render_export(rows: &[ScoredArticle]) -> (String, usize) {
    let mut out = String::new();
    write_record(&mut out, &EXPORT_HEADERS);

    let mut seen = HashSet::new();
    let mut written = 0;
    for row in rows {
        let a = &row.article;
        if !seen.insert(a.link.as_str()) {
            continue;
        }

        let content = format!("{} {}", a.title, a.description);
        let s = row.score.as_ref();
        let keyword = s
            .map(|s| s.keyword.clone())
            .or_else(|| a.keyword.clone())
            .unwrap_or_default();

        write_record(
            &mut out,
            &[
                a.id.to_string(),
                a.category.clone(),
                a.title.clone(),
                a.link.clone(),
                a.description.clone(),
                content.trim_end().to_string(),
                keyword,
                format_number(s.and_then(|s| s.target_similarity)),
                format_number(s.and_then(|s| s.opposite_similarity)),
                format_number(s.and_then(|s| s.bias_score)),
                s.and_then(|s| s.label)
                    .map(|l| l.as_str().to_string())
                    .unwrap_or_default(),
                s.and_then(|s| s.resolved_subject.clone())
                    .unwrap_or_default(),
                s.and_then(|s| s.unscoreable_reason.clone())
                    .unwrap_or_default(),
            ],
        );
        written += 1;
    }

    (out, written)
}

/// Export every stored article to a CSV file. Returns the rows written.
pub async fn export_csv(db: &dyn Database, path: &Path) -> Result<usize> {
    let rows = db.get_scored_articles().await?;
    let (csv, written) = render_export(&rows);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    std::fs::write(path, csv)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;

    info!(path = %path.display(), rows = written, "Exported articles");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{ArticleRecord, StoredScore};
    use crate::engine::polarity::PolarityLabel;

    fn record(id: i64, link: &str) -> ArticleRecord {
        ArticleRecord {
            id,
            category: "politics".to_string(),
            title: format!("title {id}"),
            link: link.to_string(),
            description: "body".to_string(),
            keyword: None,
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn import_cleans_markup_and_skips_rows_without_link() {
        let text = "title,link,description,keyword\n\
                    <b>Budget</b> &quot;talks&quot;,http://a,R&amp;D cuts,budget\n\
                    no link,,whatever,\n\
                    plain,http://b,,\n";
        let (articles, skipped) = parse_articles(text).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Budget talks");
        assert_eq!(articles[0].description, "R&D cuts");
        assert_eq!(articles[0].keyword.as_deref(), Some("budget"));
        assert_eq!(articles[1].keyword, None);
        assert_eq!(articles[1].category, "");
    }

    #[test]
    fn import_requires_link_column() {
        assert!(parse_articles("title,description\na,b\n").is_err());
    }

    #[test]
    fn export_dedupes_by_link_and_leaves_unscored_cells_empty() {
        let scored = ScoredArticle {
            article: record(1, "http://a"),
            score: Some(StoredScore {
                keyword: "budget".to_string(),
                target_similarity: Some(0.5),
                opposite_similarity: Some(0.25),
                bias_score: Some(0.25),
                label: Some(PolarityLabel::Target),
                resolved_subject: Some("budget".to_string()),
                unscoreable_reason: None,
                threshold: 0.03,
                scored_at: "2024-01-01 00:00:00".to_string(),
            }),
        };
        let unscored = ScoredArticle {
            article: record(2, "http://b"),
            score: None,
        };
        let duplicate = ScoredArticle {
            article: record(3, "http://a"),
            score: None,
        };

        let (csv, written) = render_export(&[scored, unscored, duplicate]);
        assert_eq!(written, 2);

        let table = CsvTable::parse(&csv).unwrap();
        assert_eq!(table.records.len(), 2);
        let bias = table.column("bias_score");
        let label = table.column("label");
        let content = table.column("content");
        assert_eq!(CsvTable::field(&table.records[0], bias), "0.25");
        assert_eq!(CsvTable::field(&table.records[0], label), "TARGET");
        assert_eq!(CsvTable::field(&table.records[0], content), "title 1 body");
        assert_eq!(CsvTable::field(&table.records[1], bias), "");
        assert_eq!(CsvTable::field(&table.records[1], label), "");
    }
}
