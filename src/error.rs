// Error taxonomy for the scoring engine.
//
// Two very different kinds of failure live here. `ConfigError` is fatal and
// only happens while loading the keyword table or the embedding model.
// `Unscoreable` is an ordinary outcome of a scoring call: the article, the
// keyword or the antonym group had nothing usable in the vocabulary, or a
// similarity hit a zero-norm vector. Callers get it as the `Err` side of a
// scoring result and must never turn it into a numeric 0.0.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup problems with the keyword table, the model file or settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: missing required column `{column}`")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{path}:{line}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),
}

/// Numeric failure inside a cosine similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VectorError {
    #[error("operand has zero norm")]
    ZeroNorm,

    #[error("dimension mismatch ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },

    #[error("similarity is not a finite number")]
    NonFinite,
}

/// Which input of a scoring call had no usable embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularyGap {
    /// The keyword (or free term) has no target anchor.
    Target,
    /// No antonym of the keyword resolved to a vector.
    Opposite,
    /// No article token survived vocabulary and length filtering.
    Article,
}

impl fmt::Display for VocabularyGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            VocabularyGap::Target => "target anchor",
            VocabularyGap::Opposite => "opposite anchor",
            VocabularyGap::Article => "article vector",
        };
        write!(f, "no {what}")
    }
}

/// Which similarity a degenerate vector broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Target,
    Opposite,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Target => write!(f, "target similarity"),
            Operand::Opposite => write!(f, "opposite similarity"),
        }
    }
}

/// A scoring call that produced no opinion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unscoreable {
    #[error("`{0}` is not a configured keyword")]
    UnknownKeyword(String),

    #[error("vocabulary gap: {0}")]
    VocabularyGap(VocabularyGap),

    #[error("degenerate vector in {operand}: {source}")]
    DegenerateVector {
        operand: Operand,
        #[source]
        source: VectorError,
    },
}

impl Unscoreable {
    /// Stable code persisted next to rows that could not be scored.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Unscoreable::UnknownKeyword(_) => "unknown_keyword",
            Unscoreable::VocabularyGap(VocabularyGap::Target) => "no_target_anchor",
            Unscoreable::VocabularyGap(VocabularyGap::Opposite) => "no_opposite_anchor",
            Unscoreable::VocabularyGap(VocabularyGap::Article) => "no_article_signal",
            Unscoreable::DegenerateVector { .. } => "degenerate_vector",
        }
    }
}
