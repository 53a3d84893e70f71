// Polarity scorer: directional similarity and the three-way label.
//
// An article is compared against both ends of an axis:
//
//   target_similarity   = cos(article, keyword anchor)
//   opposite_similarity = cos(article, antonym-group anchor)
//   bias_score          = target_similarity - opposite_similarity
//
// Positive bias means the article sits closer to the configured keyword;
// negative means closer to its antonyms. A symmetric dead zone of width
// `threshold` on each side of zero is NEUTRAL, and the boundary values
// themselves fall inside it (strict comparisons).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::anchors::Anchor;
use super::vectorize::ArticleVector;
use crate::embedding::vector::cosine_similarity;
use crate::error::{Operand, Unscoreable, VocabularyGap};

/// Dead-zone half-width used by the batch rescoring pipeline.
pub const DEFAULT_THRESHOLD: f64 = 0.03;

/// Which end of the axis an article leans toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolarityLabel {
    Target,
    Opposite,
    Neutral,
}

impl PolarityLabel {
    /// Classify a bias score against a symmetric threshold.
    ///
    /// NaN fails both comparisons and lands on Neutral, though `score`
    /// never produces one.
    pub fn from_bias(bias_score: f64, threshold: f64) -> Self {
        match bias_score {
            b if b > threshold => PolarityLabel::Target,
            b if b < -threshold => PolarityLabel::Opposite,
            _ => PolarityLabel::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolarityLabel::Target => "TARGET",
            PolarityLabel::Opposite => "OPPOSITE",
            PolarityLabel::Neutral => "NEUTRAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TARGET" => Some(PolarityLabel::Target),
            "OPPOSITE" => Some(PolarityLabel::Opposite),
            "NEUTRAL" => Some(PolarityLabel::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for PolarityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A computed polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub target_similarity: f64,
    pub opposite_similarity: f64,
    pub bias_score: f64,
    pub label: PolarityLabel,
}

/// Classify a bias score. See [`PolarityLabel::from_bias`].
pub fn classify(bias_score: f64, threshold: f64) -> PolarityLabel {
    PolarityLabel::from_bias(bias_score, threshold)
}

/// Score an article vector against an anchor pair.
///
/// Any absent input makes the call unscoreable. A zero-norm operand makes the
/// corresponding cosine undefined, which is also reported as unscoreable
/// rather than coerced to zero.
pub fn score(
    article: Option<&ArticleVector>,
    target: Option<&Anchor>,
    opposite: Option<&Anchor>,
    threshold: f64,
) -> Result<ScoreResult, Unscoreable> {
    let target = target.ok_or(Unscoreable::VocabularyGap(VocabularyGap::Target))?;
    let opposite = opposite.ok_or(Unscoreable::VocabularyGap(VocabularyGap::Opposite))?;
    let article = article.ok_or(Unscoreable::VocabularyGap(VocabularyGap::Article))?;

    let target_similarity =
        cosine_similarity(&article.vector, &target.vector).map_err(|source| {
            Unscoreable::DegenerateVector {
                operand: Operand::Target,
                source,
            }
        })?;
    let opposite_similarity =
        cosine_similarity(&article.vector, &opposite.vector).map_err(|source| {
            Unscoreable::DegenerateVector {
                operand: Operand::Opposite,
                source,
            }
        })?;

    let bias_score = target_similarity - opposite_similarity;

    Ok(ScoreResult {
        target_similarity,
        opposite_similarity,
        bias_score,
        label: classify(bias_score, threshold),
    })
}
