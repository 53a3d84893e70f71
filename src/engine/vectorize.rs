// Article vectorizer: one mean vector per article.
//
// Title and body are joined with a single space and tokenized together.
// Tokens of one character or fewer are discarded, as are tokens the
// vocabulary does not know. Repeated tokens count once per occurrence.

use crate::embedding::traits::EmbeddingLookup;
use crate::embedding::vector::mean;
use crate::tokenize::traits::Tokenizer;

/// Tokens shorter than this (in characters) carry no signal.
pub const MIN_TOKEN_CHARS: usize = 2;

/// The averaged article embedding and the tokens that went into it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleVector {
    pub vector: Vec<f64>,
    pub tokens: Vec<String>,
}

/// Vectorize an article. `None` when no token survives filtering.
pub fn vectorize(
    lookup: &dyn EmbeddingLookup,
    tokenizer: &dyn Tokenizer,
    title: &str,
    body: &str,
) -> Option<ArticleVector> {
    let text = format!("{title} {body}");

    let tokens: Vec<String> = tokenizer
        .tokenize(&text)
        .into_iter()
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|t| lookup.contains(t))
        .collect();

    let rows: Vec<&[f32]> = tokens.iter().filter_map(|t| lookup.lookup(t)).collect();
    let vector = mean(&rows)?;

    Some(ArticleVector { vector, tokens })
}
