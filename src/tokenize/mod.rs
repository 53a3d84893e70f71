// Tokenization: raw text to an ordered list of candidate content tokens.

pub mod dictionary;
pub mod traits;

pub use dictionary::DictionaryTokenizer;
pub use traits::Tokenizer;
