use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use slant::config::Config;
use slant::embedding::WordVectors;
use slant::engine::polarity::PolarityLabel;
use slant::keywords::KeywordTable;
use slant::output::terminal;
use slant::{ScoringEngine, Subject};

/// Slant: polarity scoring for news articles.
///
/// Places each article on a keyword/antonym axis by comparing its mean word
/// embedding against both ends of the axis.
#[derive(Parser)]
#[command(name = "slant", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Show the resolved anchor pair for every configured keyword
    Anchors {
        /// Also resolve a free-form term and show which tokens it used
        #[arg(long)]
        term: Option<String>,
    },

    /// Score a single article
    Score {
        /// Article title
        title: String,

        /// Article body or summary
        #[arg(long, default_value = "")]
        body: String,

        /// Configured keyword to score against (detected from the text if omitted)
        #[arg(long)]
        keyword: Option<String>,

        /// Free-form term to use as the target side; needs --keyword for the
        /// opposite side
        #[arg(long, requires = "keyword")]
        term: Option<String>,

        /// Override the NEUTRAL threshold
        #[arg(long)]
        threshold: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import articles from a CSV file (title, link, category, description, keyword)
    Import {
        /// Path to the CSV file
        path: PathBuf,
    },

    /// Score stored articles and save the results
    Batch {
        /// Rescore every article, not only unscored ones
        #[arg(long)]
        rescore: bool,

        /// Rows per committed transaction (default: SLANT_COMMIT_CHUNK or 100)
        #[arg(long)]
        chunk: Option<usize>,

        /// Articles scored in parallel (default: SLANT_CONCURRENCY or 4)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Override the NEUTRAL threshold
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Show the strongest article on each side of a keyword's axis
    Report {
        /// Configured keyword
        keyword: String,
    },

    /// Export stored articles and scores to CSV (one row per link)
    Export {
        /// Output path
        #[arg(default_value = "./slant_export.csv")]
        path: PathBuf,
    },

    /// List the vocabulary entries nearest to a word
    Neighbors {
        word: String,

        /// How many neighbours to show
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Show system status (model, keywords, DB stats, last batch)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("slant=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing Slant database...");
            let db = slant::db::initialize_sqlite(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext steps:");
            println!("  1. Point SLANT_MODEL_PATH at a word2vec text file");
            println!("  2. Point SLANT_KEYWORDS_PATH at your keyword/antonym CSV");
            println!("  3. slant import <articles.csv> && slant batch");
        }

        Commands::Anchors { term } => {
            let engine = load_engine(&config, None)?;
            terminal::display_anchors(engine.keywords(), engine.anchors());
            if let Some(term) = term {
                let anchor = engine.resolve_free_term_anchor(&term);
                terminal::display_free_term(&term, anchor.as_ref());
            }
        }

        Commands::Score {
            title,
            body,
            keyword,
            term,
            threshold,
            json,
        } => {
            let engine = load_engine(&config, threshold)?;

            let subject = match (term, keyword) {
                (Some(term), Some(axis)) => Subject::term(term, axis),
                (None, Some(keyword)) => Subject::keyword(keyword),
                (_, None) => match engine.detect_subject(&title, &body) {
                    Some(found) => Subject::keyword(found),
                    None => anyhow::bail!(
                        "No configured keyword appears in the article. Pass --keyword."
                    ),
                },
            };

            let outcome = engine.score_article(&title, &body, &subject);
            if json {
                let value = match &outcome {
                    Ok(score) => serde_json::to_value(score)?,
                    Err(reason) => serde_json::json!({
                        "unscoreable": reason.reason_code(),
                        "message": reason.to_string(),
                    }),
                };
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let label = match &subject {
                    Subject::Keyword(k) => k.clone(),
                    Subject::Term { text, axis } => format!("{text} (axis: {axis})"),
                };
                terminal::display_score(&label, &outcome, engine.threshold());
            }
        }

        Commands::Import { path } => {
            let db = slant::db::initialize_sqlite(&config.db_path)?;
            let summary = slant::corpus::import_csv(db.as_ref(), &path).await?;
            terminal::display_import_summary(&summary);
        }

        Commands::Batch {
            rescore,
            chunk,
            concurrency,
            threshold,
        } => {
            let engine = Arc::new(load_engine(&config, threshold)?);
            let db = slant::db::open_sqlite(&config.db_path)?;

            let mut options = config.batch_options(rescore);
            if let Some(chunk) = chunk {
                options.chunk_size = chunk;
            }
            if let Some(concurrency) = concurrency {
                options.concurrency = concurrency;
            }

            let summary = slant::pipeline::batch::run(engine, db.as_ref(), &options).await?;
            terminal::display_batch_summary(&summary);
        }

        Commands::Report { keyword } => {
            let db = slant::db::open_sqlite(&config.db_path)?;
            let target = db.get_ranked(&keyword, PolarityLabel::Target, 1).await?;
            let opposite = db.get_ranked(&keyword, PolarityLabel::Opposite, 1).await?;
            terminal::display_report(&keyword, target.first(), opposite.first());
        }

        Commands::Export { path } => {
            let db = slant::db::open_sqlite(&config.db_path)?;
            let written = slant::corpus::export_csv(db.as_ref(), &path).await?;
            println!("Exported {} articles to {}", written, path.display());
        }

        Commands::Neighbors { word, top } => {
            config.require_model()?;
            let vectors = WordVectors::load(&config.model_path)?;
            let neighbors = vectors.nearest(&word, top);
            terminal::display_neighbors(&word, neighbors.as_deref());
        }

        Commands::Status => {
            let db = if Path::new(&config.db_path).exists() {
                Some(slant::db::open_sqlite(&config.db_path)?)
            } else {
                None
            };
            slant::status::show(db.as_ref(), &config).await?;
        }
    }

    Ok(())
}

/// Load the keyword table and model, then build the engine.
fn load_engine(config: &Config, threshold: Option<f64>) -> Result<ScoringEngine> {
    config.require_keywords()?;
    config.require_model()?;

    let keywords = KeywordTable::load(&config.keywords_path)?;
    let vectors = WordVectors::load(&config.model_path)?;

    let mut settings = config.scoring_settings();
    if let Some(threshold) = threshold {
        settings.threshold = threshold;
    }

    let engine = ScoringEngine::build(
        Arc::new(vectors),
        Box::new(config.stop_words.tokenizer()),
        keywords,
        settings,
    )?;

    if engine.anchors().scoreable_count() == 0 {
        warn!("No keyword resolved both anchors, every article will be unscoreable");
    }

    Ok(engine)
}
