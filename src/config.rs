use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::engine::polarity::DEFAULT_THRESHOLD;
use crate::engine::ScoringSettings;
use crate::pipeline::batch::BatchOptions;
use crate::tokenize::DictionaryTokenizer;

/// Which stop-word list the tokenizer drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopWords {
    /// The `stop-words` crate's English list (default)
    English,
    /// Keep every token
    None,
}

impl StopWords {
    pub fn tokenizer(&self) -> DictionaryTokenizer {
        match self {
            StopWords::English => DictionaryTokenizer::english(),
            StopWords::None => DictionaryTokenizer::new(),
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// word2vec text file
    pub model_path: PathBuf,
    /// Keyword/antonym CSV
    pub keywords_path: PathBuf,
    pub db_path: String,
    /// Half-width of the NEUTRAL band
    pub threshold: f64,
    /// Rows per committed transaction during batch scoring
    pub commit_chunk: usize,
    /// Articles scored in parallel during batch scoring
    pub concurrency: usize,
    pub stop_words: StopWords,
}

/// Platform data directory for the model: ~/.local/share/slant/models/ on Linux.
pub fn default_model_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slant")
        .join("models")
        .join("vectors.txt")
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        _ => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables. Every variable has a
    /// default; only malformed values are errors.
    pub fn load() -> Result<Self> {
        let stop_words = match env::var("SLANT_STOP_WORDS").as_deref() {
            Ok("none") => StopWords::None,
            Ok("english") | Err(_) => StopWords::English,
            Ok(other) => anyhow::bail!(
                "SLANT_STOP_WORDS must be `english` or `none`, got `{other}`"
            ),
        };

        let threshold = parse_var("SLANT_THRESHOLD", DEFAULT_THRESHOLD)?;
        if !threshold.is_finite() || threshold < 0.0 {
            anyhow::bail!("SLANT_THRESHOLD must be a non-negative number, got {threshold}");
        }

        let defaults = BatchOptions::default();

        Ok(Self {
            model_path: env::var("SLANT_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_model_path()),
            keywords_path: env::var("SLANT_KEYWORDS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/keywords.csv")),
            db_path: env::var("SLANT_DB_PATH").unwrap_or_else(|_| "./slant.db".to_string()),
            threshold,
            commit_chunk: parse_var("SLANT_COMMIT_CHUNK", defaults.chunk_size)?,
            concurrency: parse_var("SLANT_CONCURRENCY", defaults.concurrency)?,
            stop_words,
        })
    }

    pub fn scoring_settings(&self) -> ScoringSettings {
        ScoringSettings {
            threshold: self.threshold,
        }
    }

    pub fn batch_options(&self, rescore: bool) -> BatchOptions {
        BatchOptions {
            chunk_size: self.commit_chunk,
            concurrency: self.concurrency,
            rescore,
        }
    }

    /// Check that the embedding model file exists.
    pub fn require_model(&self) -> Result<()> {
        require_file(
            &self.model_path,
            "Embedding model not found",
            "Set SLANT_MODEL_PATH to a word2vec text file.",
        )
    }

    /// Check that the keyword table exists.
    pub fn require_keywords(&self) -> Result<()> {
        require_file(
            &self.keywords_path,
            "Keyword table not found",
            "Set SLANT_KEYWORDS_PATH to a CSV with keyword, antonym and category columns.",
        )
    }
}

fn require_file(path: &Path, what: &str, hint: &str) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!(
            "{what} at {}\n{hint}\nSee .env.example for the available variables.",
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_path_ends_in_slant_models() {
        let path = default_model_path();
        assert!(path.ends_with("slant/models/vectors.txt"));
    }

    #[test]
    fn require_file_reports_missing_path() {
        let err = require_file(Path::new("/nonexistent/slant.csv"), "Missing", "hint")
            .unwrap_err()
            .to_string();
        assert!(err.contains("/nonexistent/slant.csv"));
    }

    #[test]
    fn stop_word_setting_picks_tokenizer() {
        use crate::tokenize::Tokenizer;
        assert_eq!(StopWords::None.tokenizer().tokenize("the law"), vec!["the", "law"]);
        assert_eq!(StopWords::English.tokenizer().tokenize("the law"), vec!["law"]);
    }
}
