// Tokenizer trait.
//
// Like `EmbeddingLookup`, this is a seam: the engine depends on the
// behaviour ("text in, ordered tokens out; registered terms stay whole"),
// not on any particular segmentation strategy.

/// Splits text into candidate content tokens.
///
/// The user dictionary is mutable only during engine construction. Once the
/// engine is built the tokenizer is shared read-only across threads.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text`, preserving the order tokens appear in.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Split a single term into its parts. Unlike `tokenize`, a term that is
    /// itself registered is not returned whole.
    fn decompose(&self, term: &str) -> Vec<String> {
        self.tokenize(term)
    }

    /// Register a term that must come out as a single token.
    fn add_term(&mut self, term: &str);
}
