// Scoring engine: ties the vocabulary, tokenizer, keyword table and anchors
// together behind one read-only handle.
//
// Construction is the only phase that mutates anything: every keyword and
// antonym is registered with the tokenizer, then anchors are resolved. After
// `build` returns the engine is immutable and can be shared across threads
// behind an `Arc`.

pub mod anchors;
pub mod polarity;
pub mod vectorize;

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::embedding::traits::EmbeddingLookup;
use crate::error::{ConfigError, Unscoreable};
use crate::keywords::KeywordTable;
use crate::tokenize::traits::Tokenizer;

use anchors::{Anchor, AnchorPair, AnchorResolver, AnchorSet};
use polarity::{ScoreResult, DEFAULT_THRESHOLD};
use vectorize::ArticleVector;

/// Tunables fixed at engine construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringSettings {
    /// Half-width of the NEUTRAL dead zone around zero bias.
    pub threshold: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// What an article is being scored about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    /// A configured keyword. Its target anchor is the keyword's own vector.
    Keyword(String),
    /// A free-form term measured against the antonyms of configured keyword
    /// `axis`. The target anchor falls back to sub-tokens when the whole term
    /// is not in the vocabulary.
    Term { text: String, axis: String },
}

impl Subject {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Subject::Keyword(keyword.into())
    }

    pub fn term(text: impl Into<String>, axis: impl Into<String>) -> Self {
        Subject::Term {
            text: text.into(),
            axis: axis.into(),
        }
    }

    /// The configured keyword whose antonyms form the opposite side.
    pub fn axis(&self) -> &str {
        match self {
            Subject::Keyword(k) => k,
            Subject::Term { axis, .. } => axis,
        }
    }
}

/// A successful scoring call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleScore {
    #[serde(flatten)]
    pub result: ScoreResult,
    /// Vocabulary entries that made up the target anchor.
    pub resolved_subject: String,
    /// Article tokens that contributed to the article vector.
    pub tokens_used: usize,
}

pub struct ScoringEngine {
    lookup: Arc<dyn EmbeddingLookup>,
    tokenizer: Box<dyn Tokenizer>,
    keywords: KeywordTable,
    anchors: AnchorSet,
    threshold: f64,
}

impl ScoringEngine {
    /// Register the keyword dictionary, resolve every anchor pair and freeze.
    pub fn build(
        lookup: Arc<dyn EmbeddingLookup>,
        mut tokenizer: Box<dyn Tokenizer>,
        keywords: KeywordTable,
        settings: ScoringSettings,
    ) -> Result<Self, ConfigError> {
        let threshold = settings.threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(threshold));
        }

        let terms = keywords.dictionary_terms();
        for term in &terms {
            tokenizer.add_term(term);
        }
        debug!(terms = terms.len(), "Registered dictionary terms");

        let anchors =
            AnchorResolver::new(lookup.as_ref(), tokenizer.as_ref()).build_set(&keywords);

        info!(
            keywords = keywords.len(),
            scoreable = anchors.scoreable_count(),
            dimensions = lookup.dimensionality(),
            threshold,
            "Scoring engine ready"
        );

        Ok(Self {
            lookup,
            tokenizer,
            keywords,
            anchors,
            threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    pub fn anchor_pair(&self, keyword: &str) -> Option<&AnchorPair> {
        self.anchors.get(keyword.trim())
    }

    pub fn lookup(&self) -> &dyn EmbeddingLookup {
        self.lookup.as_ref()
    }

    fn resolver(&self) -> AnchorResolver<'_> {
        AnchorResolver::new(self.lookup.as_ref(), self.tokenizer.as_ref())
    }

    /// Mean embedding of an article's in-vocabulary tokens.
    pub fn vectorize(&self, title: &str, body: &str) -> Option<ArticleVector> {
        vectorize::vectorize(self.lookup.as_ref(), self.tokenizer.as_ref(), title, body)
    }

    /// Target anchor for a term that need not be a configured keyword.
    pub fn resolve_free_term_anchor(&self, term: &str) -> Option<Anchor> {
        self.resolver().resolve_free_term_anchor(term)
    }

    /// The first configured keyword (in table order) that appears verbatim
    /// in the title or body.
    pub fn detect_subject(&self, title: &str, body: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(|e| e.keyword.as_str())
            .find(|k| title.contains(k) || body.contains(k))
    }

    /// Score one article about `subject`.
    pub fn score_article(
        &self,
        title: &str,
        body: &str,
        subject: &Subject,
    ) -> Result<ArticleScore, Unscoreable> {
        let axis = subject.axis().trim();
        let pair = self
            .anchors
            .get(axis)
            .ok_or_else(|| Unscoreable::UnknownKeyword(axis.to_string()))?;

        let target: Option<Cow<'_, Anchor>> = match subject {
            Subject::Keyword(_) => pair.target.as_ref().map(Cow::Borrowed),
            Subject::Term { text, .. } => self.resolve_free_term_anchor(text).map(Cow::Owned),
        };

        let article = self.vectorize(title, body);
        let result = polarity::score(
            article.as_ref(),
            target.as_deref(),
            pair.opposite.as_ref(),
            self.threshold,
        )?;

        Ok(ArticleScore {
            result,
            resolved_subject: target
                .map(|t| t.resolved_subject())
                .unwrap_or_default(),
            tokens_used: article.map(|a| a.tokens.len()).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::word2vec::WordVectors;
    use crate::error::VocabularyGap;
    use crate::keywords::KeywordConfig;
    use crate::tokenize::dictionary::DictionaryTokenizer;
    use polarity::PolarityLabel;

    fn engine(threshold: f64) -> Result<ScoringEngine, ConfigError> {
        let vectors = WordVectors::from_entries(
            2,
            vec![
                ("hawk", vec![1.0, 0.0]),
                ("dove", vec![-1.0, 0.0]),
                ("missile", vec![0.9, 0.1]),
                ("treaty", vec![-0.9, 0.1]),
            ],
        )?;
        let table = KeywordTable::from_entries(vec![
            KeywordConfig::new("hawk", "dove", "security"),
            KeywordConfig::new("orphan", "", "misc"),
        ]);
        ScoringEngine::build(
            Arc::new(vectors),
            Box::new(DictionaryTokenizer::new()),
            table,
            ScoringSettings { threshold },
        )
    }

    #[test]
    fn negative_threshold_is_rejected() {
        assert!(matches!(
            engine(-0.1),
            Err(ConfigError::InvalidThreshold(_))
        ));
        assert!(matches!(
            engine(f64::NAN),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn scores_toward_the_keyword() {
        let e = engine(0.03).unwrap();
        let s = e
            .score_article("missile test", "", &Subject::keyword("hawk"))
            .unwrap();
        assert_eq!(s.result.label, PolarityLabel::Target);
        assert_eq!(s.resolved_subject, "hawk");
        assert_eq!(s.tokens_used, 1);
    }

    #[test]
    fn unknown_keyword_is_unscoreable() {
        let e = engine(0.03).unwrap();
        assert_eq!(
            e.score_article("missile", "", &Subject::keyword("nope")),
            Err(Unscoreable::UnknownKeyword("nope".to_string()))
        );
    }

    #[test]
    fn keyword_without_antonyms_is_unscoreable() {
        let e = engine(0.03).unwrap();
        assert_eq!(
            e.score_article("missile", "", &Subject::keyword("orphan")),
            Err(Unscoreable::VocabularyGap(VocabularyGap::Target))
        );
    }

    #[test]
    fn free_term_borrows_the_axis_antonyms() {
        let e = engine(0.03).unwrap();
        let s = e
            .score_article("treaty signed", "", &Subject::term("missile", "hawk"))
            .unwrap();
        assert_eq!(s.result.label, PolarityLabel::Opposite);
        assert_eq!(s.resolved_subject, "missile");
    }

    #[test]
    fn detects_first_configured_keyword() {
        let e = engine(0.03).unwrap();
        assert_eq!(e.detect_subject("a hawk and an orphan", ""), Some("hawk"));
        assert_eq!(e.detect_subject("", "the orphan"), Some("orphan"));
        assert_eq!(e.detect_subject("nothing", "here"), None);
    }

    #[test]
    fn blank_keyword_never_matches_every_article() {
        let vectors = WordVectors::from_entries(2, vec![("war", vec![1.0, 0.0])]).unwrap();
        let table = KeywordTable::from_entries(vec![
            KeywordConfig::new("", "peace", "misc"),
            KeywordConfig::new("hawk", "dove", "security"),
        ]);
        let e = ScoringEngine::build(
            Arc::new(vectors),
            Box::new(DictionaryTokenizer::new()),
            table,
            ScoringSettings::default(),
        )
        .unwrap();
        assert_eq!(e.detect_subject("war story", ""), None);
    }
}
