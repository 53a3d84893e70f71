// Dictionary-aware word tokenizer.
//
// Words are maximal runs of alphanumeric characters, with `-` and `'` allowed
// inside a word (so "anti-war" and "don't" stay whole) but trimmed from its
// edges. Before a word is emitted on its own, the tokenizer tries to match a
// registered dictionary phrase starting at that word; the longest phrase wins
// and is emitted with its registered spelling. This is what keeps a
// multi-word keyword like "four rivers project" from being split into three
// unrelated tokens.
//
// Stop words are dropped case-insensitively. Dictionary terms are never
// treated as stop words.

use std::collections::{HashMap, HashSet};

use stop_words::{get, LANGUAGE};

use super::traits::Tokenizer;

/// Characters allowed inside a word but not at its edges.
const JOINERS: [char; 3] = ['-', '\'', '\u{2019}'];

/// A registered term, split into the words it must match.
#[derive(Debug, Clone)]
struct Phrase {
    words: Vec<String>,
    term: String,
}

#[derive(Debug, Clone, Default)]
pub struct DictionaryTokenizer {
    stop_words: HashSet<String>,
    /// First word -> phrases starting with it, longest first.
    phrases: HashMap<String, Vec<Phrase>>,
    terms: HashSet<String>,
}

impl DictionaryTokenizer {
    /// A tokenizer with no stop words and an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tokenizer that drops the given stop words.
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            ..Self::default()
        }
    }

    /// A tokenizer using the English stop-word list.
    pub fn english() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::with_stop_words(words)
    }

    /// Number of registered dictionary terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Longest phrase of at most `max_words` words starting at `rest[0]`.
    fn match_phrase(&self, rest: &[&str], max_words: usize) -> Option<&Phrase> {
        let bucket = self.phrases.get(*rest.first()?)?;
        bucket.iter().find(|p| {
            p.words.len() <= rest.len().min(max_words)
                && p.words.iter().zip(rest).all(|(a, b)| a == b)
        })
    }

    fn segment(&self, text: &str, whole_phrase_allowed: bool) -> Vec<String> {
        let words = split_words(text);
        let mut tokens = Vec::with_capacity(words.len());
        let max_words = if whole_phrase_allowed {
            words.len()
        } else {
            words.len().saturating_sub(1)
        };

        let mut i = 0;
        while i < words.len() {
            if let Some(phrase) = self.match_phrase(&words[i..], max_words) {
                tokens.push(phrase.term.clone());
                i += phrase.words.len();
                continue;
            }

            let word = words[i];
            if !self.stop_words.contains(&word.to_lowercase()) {
                tokens.push(word.to_string());
            }
            i += 1;
        }

        tokens
    }
}

impl Tokenizer for DictionaryTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.segment(text, true)
    }

    fn decompose(&self, term: &str) -> Vec<String> {
        self.segment(term, false)
    }

    fn add_term(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() || self.terms.contains(term) {
            return;
        }

        let words: Vec<String> = split_words(term).into_iter().map(String::from).collect();
        let Some(first) = words.first().cloned() else {
            return;
        };

        self.terms.insert(term.to_string());
        let bucket = self.phrases.entry(first).or_default();
        bucket.push(Phrase {
            words,
            term: term.to_string(),
        });
        // Stable sort: among equal lengths, earlier registrations win
        bucket.sort_by(|a, b| b.words.len().cmp(&a.words.len()));
    }
}

/// Split text into words on anything that is not alphanumeric or a joiner.
fn split_words(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || JOINERS.contains(&c)))
        .map(|w| w.trim_matches(|c: char| JOINERS.contains(&c)))
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_whitespace() {
        let t = DictionaryTokenizer::new();
        assert_eq!(
            t.tokenize("Senate votes, again: tax-cut \"bill\"!"),
            vec!["Senate", "votes", "again", "tax-cut", "bill"]
        );
    }

    #[test]
    fn trims_joiners_at_word_edges() {
        let t = DictionaryTokenizer::new();
        assert_eq!(t.tokenize("-- 'quoted' --"), vec!["quoted"]);
    }

    #[test]
    fn empty_and_punctuation_only_text_yield_nothing() {
        let t = DictionaryTokenizer::new();
        assert!(t.tokenize("").is_empty());
        assert!(t.tokenize("  ... !!! -- ").is_empty());
    }

    #[test]
    fn drops_stop_words_case_insensitively() {
        let t = DictionaryTokenizer::with_stop_words(["the", "of"]);
        assert_eq!(t.tokenize("The Rule of law"), vec!["Rule", "law"]);
    }

    #[test]
    fn registered_phrase_stays_whole() {
        let mut t = DictionaryTokenizer::new();
        t.add_term("four rivers project");
        assert_eq!(
            t.tokenize("the four rivers project stalled"),
            vec!["the", "four rivers project", "stalled"]
        );
    }

    #[test]
    fn longest_phrase_wins() {
        let mut t = DictionaryTokenizer::new();
        t.add_term("labor");
        t.add_term("labor union law");
        assert_eq!(t.tokenize("labor union law passes"), vec!["labor union law", "passes"]);
        assert_eq!(t.tokenize("labor union"), vec!["labor", "union"]);
    }

    #[test]
    fn phrase_emits_registered_spelling() {
        let mut t = DictionaryTokenizer::new();
        t.add_term("U.S.");
        assert_eq!(t.tokenize("U S trade"), vec!["U.S.", "trade"]);
    }

    #[test]
    fn dictionary_terms_are_not_stop_words() {
        let mut t = DictionaryTokenizer::with_stop_words(["us"]);
        t.add_term("us");
        assert_eq!(t.tokenize("us"), vec!["us"]);
    }

    #[test]
    fn handles_non_latin_scripts() {
        let mut t = DictionaryTokenizer::new();
        t.add_term("건국절");
        assert_eq!(t.tokenize("건국절 제정, 광복절"), vec!["건국절", "제정", "광복절"]);
    }

    #[test]
    fn decompose_splits_a_registered_term() {
        let mut t = DictionaryTokenizer::new();
        t.add_term("labor");
        t.add_term("labor union law");
        assert_eq!(t.tokenize("labor union law"), vec!["labor union law"]);
        assert_eq!(t.decompose("labor union law"), vec!["labor", "union", "law"]);
    }

    #[test]
    fn repeated_registration_is_ignored() {
        let mut t = DictionaryTokenizer::new();
        t.add_term("tax");
        t.add_term(" tax ");
        assert_eq!(t.term_count(), 1);
    }

    #[test]
    fn english_list_filters_common_words() {
        let t = DictionaryTokenizer::english();
        let tokens = t.tokenize("the budget and the deficit");
        assert_eq!(tokens, vec!["budget", "deficit"]);
    }
}
