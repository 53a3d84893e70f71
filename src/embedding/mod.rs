// Embedding lookup: the word-vector service the scoring engine reads from.

pub mod traits;
pub mod vector;
pub mod word2vec;

pub use traits::EmbeddingLookup;
pub use word2vec::WordVectors;
