// Anchor resolution: the reference vectors each axis is measured against.
//
// The target anchor of a keyword is its own vocabulary vector, verbatim.
// The opposite anchor is the mean over the keyword's antonyms, where each
// antonym contributes either its own vector (when the whole string is in
// the vocabulary) or the mean of whichever of its sub-tokens are. Antonyms
// that contribute nothing are dropped from the mean; they never pull it
// toward the origin.
//
// Anchors are computed once when the engine is built and never mutated.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::embedding::traits::EmbeddingLookup;
use crate::embedding::vector::{mean, widen};
use crate::keywords::{KeywordConfig, KeywordTable};
use crate::tokenize::traits::Tokenizer;

/// A resolved reference vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anchor {
    /// The keyword, or the free-form term, this anchor stands for.
    pub key: String,
    pub vector: Vec<f64>,
    /// Vocabulary entries that contributed to the vector, in resolution order.
    pub sources: Vec<String>,
}

impl Anchor {
    /// The vocabulary entries actually used, space-joined.
    pub fn resolved_subject(&self) -> String {
        self.sources.join(" ")
    }
}

/// Both ends of one configured axis. Either end may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnchorPair {
    pub target: Option<Anchor>,
    pub opposite: Option<Anchor>,
}

impl AnchorPair {
    pub fn is_scoreable(&self) -> bool {
        self.target.is_some() && self.opposite.is_some()
    }
}

/// Anchor pairs for every configured keyword, in keyword-table order.
#[derive(Debug, Clone, Default)]
pub struct AnchorSet {
    entries: Vec<(String, AnchorPair)>,
    index: HashMap<String, usize>,
}

impl AnchorSet {
    pub fn get(&self, keyword: &str) -> Option<&AnchorPair> {
        self.index.get(keyword).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnchorPair)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keywords whose target and opposite anchors both resolved.
    pub fn scoreable_count(&self) -> usize {
        self.entries.iter().filter(|(_, p)| p.is_scoreable()).count()
    }

    fn insert(&mut self, keyword: String, pair: AnchorPair) {
        self.index.insert(keyword.clone(), self.entries.len());
        self.entries.push((keyword, pair));
    }
}

/// Resolves anchors against one vocabulary and tokenizer.
pub struct AnchorResolver<'a> {
    lookup: &'a dyn EmbeddingLookup,
    tokenizer: &'a dyn Tokenizer,
}

impl<'a> AnchorResolver<'a> {
    pub fn new(lookup: &'a dyn EmbeddingLookup, tokenizer: &'a dyn Tokenizer) -> Self {
        Self { lookup, tokenizer }
    }

    /// The keyword's own vector. No sub-token fallback.
    pub fn target_anchor(&self, keyword: &str) -> Option<Anchor> {
        let keyword = keyword.trim();
        let row = self.lookup.lookup(keyword)?;
        Some(Anchor {
            key: keyword.to_string(),
            vector: widen(row),
            sources: vec![keyword.to_string()],
        })
    }

    /// Mean over the contributing antonyms of `keyword`.
    pub fn resolve_antonym_anchor(&self, keyword: &str, antonyms: &[String]) -> Option<Anchor> {
        self.resolve_group(keyword, antonyms.iter().map(String::as_str))
    }

    /// A target anchor for an arbitrary term, with sub-token fallback.
    pub fn resolve_free_term_anchor(&self, term: &str) -> Option<Anchor> {
        let term = term.trim();
        self.resolve_group(term, std::iter::once(term))
    }

    /// Anchor pairs for every keyword in the table.
    pub fn build_set(&self, table: &KeywordTable) -> AnchorSet {
        let mut set = AnchorSet::default();
        for entry in table.iter() {
            let pair = self.resolve_pair(entry);
            set.insert(entry.keyword.clone(), pair);
        }

        info!(
            keywords = set.len(),
            scoreable = set.scoreable_count(),
            "Resolved anchors"
        );
        set
    }

    fn resolve_pair(&self, entry: &KeywordConfig) -> AnchorPair {
        let target = self.target_anchor(&entry.keyword);
        let opposite = self.resolve_antonym_anchor(&entry.keyword, &entry.antonyms);

        match (&target, &opposite) {
            (Some(_), Some(o)) => debug!(
                keyword = %entry.keyword,
                opposite = %o.resolved_subject(),
                "Anchor pair resolved"
            ),
            (None, _) => warn!(
                keyword = %entry.keyword,
                "Keyword is not in the vocabulary, axis is unscoreable"
            ),
            (_, None) => warn!(
                keyword = %entry.keyword,
                antonyms = entry.antonyms.len(),
                "No antonym resolved, axis is unscoreable"
            ),
        }

        AnchorPair { target, opposite }
    }

    fn resolve_group<'t>(
        &self,
        key: &str,
        terms: impl IntoIterator<Item = &'t str>,
    ) -> Option<Anchor> {
        let mut contributions = Vec::new();
        let mut sources = Vec::new();

        for term in terms {
            match self.term_contribution(term) {
                Some((vector, used)) => {
                    contributions.push(vector);
                    sources.extend(used);
                }
                None => debug!(key, term, "Term contributes nothing"),
            }
        }

        let rows: Vec<&[f64]> = contributions.iter().map(Vec::as_slice).collect();
        let vector = mean(&rows)?;
        Some(Anchor {
            key: key.to_string(),
            vector,
            sources,
        })
    }

    /// One term's vector: the whole string if the vocabulary has it,
    /// otherwise the mean of its in-vocabulary sub-tokens.
    fn term_contribution(&self, term: &str) -> Option<(Vec<f64>, Vec<String>)> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        if let Some(row) = self.lookup.lookup(term) {
            return Some((widen(row), vec![term.to_string()]));
        }

        let tokens: Vec<String> = self
            .tokenizer
            .decompose(term)
            .into_iter()
            .filter(|t| self.lookup.contains(t))
            .collect();
        let rows: Vec<&[f32]> = tokens.iter().filter_map(|t| self.lookup.lookup(t)).collect();
        let vector = mean(&rows)?;
        Some((vector, tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::word2vec::WordVectors;
    use crate::tokenize::dictionary::DictionaryTokenizer;

    fn space() -> WordVectors {
        WordVectors::from_entries(
            2,
            vec![
                ("war", vec![1.0, 0.0]),
                ("peace", vec![0.0, 1.0]),
                ("truce", vec![0.0, 0.5]),
                ("cease", vec![-1.0, 0.0]),
                ("fire", vec![0.0, -1.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn target_is_the_verbatim_row() {
        let v = space();
        let t = DictionaryTokenizer::new();
        let r = AnchorResolver::new(&v, &t);
        let a = r.target_anchor("war").unwrap();
        assert_eq!(a.vector, vec![1.0, 0.0]);
        assert_eq!(a.sources, vec!["war"]);
    }

    #[test]
    fn target_has_no_fallback() {
        let v = space();
        let t = DictionaryTokenizer::new();
        let r = AnchorResolver::new(&v, &t);
        assert!(r.target_anchor("war peace").is_none());
    }

    #[test]
    fn antonyms_missing_from_vocabulary_are_dropped() {
        let v = space();
        let t = DictionaryTokenizer::new();
        let r = AnchorResolver::new(&v, &t);
        let with_gap = r
            .resolve_antonym_anchor("war", &["peace".to_string(), "nonexistent".to_string()])
            .unwrap();
        assert_eq!(with_gap.vector, vec![0.0, 1.0]);
        assert_eq!(with_gap.sources, vec!["peace"]);
    }

    #[test]
    fn multi_word_antonym_falls_back_to_sub_tokens() {
        let v = space();
        let mut t = DictionaryTokenizer::new();
        t.add_term("cease fire");
        let r = AnchorResolver::new(&v, &t);
        let a = r
            .resolve_antonym_anchor("war", &["cease fire".to_string()])
            .unwrap();
        assert_eq!(a.vector, vec![-0.5, -0.5]);
        assert_eq!(a.resolved_subject(), "cease fire");
    }

    #[test]
    fn no_contributing_antonym_is_absent() {
        let v = space();
        let t = DictionaryTokenizer::new();
        let r = AnchorResolver::new(&v, &t);
        assert!(r.resolve_antonym_anchor("war", &[]).is_none());
        assert!(r
            .resolve_antonym_anchor("war", &["nothing here".to_string()])
            .is_none());
    }

    #[test]
    fn free_term_uses_sub_tokens() {
        let v = space();
        let t = DictionaryTokenizer::new();
        let r = AnchorResolver::new(&v, &t);
        let a = r.resolve_free_term_anchor("peace truce").unwrap();
        assert_eq!(a.vector, vec![0.0, 0.75]);
        assert_eq!(a.key, "peace truce");
        assert!(r.resolve_free_term_anchor("zzz").is_none());
    }

    #[test]
    fn build_set_keeps_table_order_and_flags_gaps() {
        let v = space();
        let t = DictionaryTokenizer::new();
        let r = AnchorResolver::new(&v, &t);
        let table = KeywordTable::from_entries(vec![
            KeywordConfig::new("war", "peace, truce", "security"),
            KeywordConfig::new("unknown", "peace", "misc"),
        ]);
        let set = r.build_set(&table);

        let keys: Vec<&str> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["war", "unknown"]);
        assert_eq!(set.scoreable_count(), 1);
        assert!(set.get("unknown").unwrap().target.is_none());
        assert_eq!(
            set.get("war").unwrap().opposite.as_ref().unwrap().vector,
            vec![0.0, 0.75]
        );
    }
}
