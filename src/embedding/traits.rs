// Embedding lookup trait: swap-ready abstraction over the vector table.
//
// The engine only ever asks two questions of the model: "what is the vector
// for this token?" and "how wide are your vectors?". Keeping that behind a
// trait lets tests build tiny synthetic spaces and lets a different on-disk
// format slot in without touching the scoring code.

/// Read-only token → vector mapping with a fixed dimensionality.
///
/// Implementations must be deterministic and safe for concurrent reads; the
/// engine shares one instance across every scoring thread.
pub trait EmbeddingLookup: Send + Sync {
    /// The vector for `token`, or `None` if it is not in the vocabulary.
    fn lookup(&self, token: &str) -> Option<&[f32]>;

    /// Width of every vector returned by `lookup`.
    fn dimensionality(&self) -> usize;

    fn contains(&self, token: &str) -> bool {
        self.lookup(token).is_some()
    }
}
