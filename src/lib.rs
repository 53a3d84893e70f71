// Slant: embedding-geometry polarity scoring for news articles
//
// This is the library root. The engine (anchors, vectorizer, scorer) is pure
// and synchronous; the store, pipeline and corpus modules wrap it for batch
// use against SQLite.

pub mod config;
pub mod corpus;
pub mod db;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod keywords;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod table;
pub mod text;
pub mod tokenize;

pub use engine::{ArticleScore, ScoringEngine, ScoringSettings, Subject};
pub use error::{ConfigError, Unscoreable};
