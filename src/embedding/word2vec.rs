// Word2vec text-format loader.
//
// The file is the plain-text export every word2vec toolkit can write:
//
//   <vocab_size> <dim>          (optional header)
//   <token> <v1> <v2> ... <vD>
//
// The last D fields of each line are the vector and everything before them is
// the token, so multi-word dictionary terms that were trained as single
// vocabulary entries survive the round trip. Without a header the
// dimensionality is taken from the first row.
//
// All rows live in one flat f32 buffer; the index maps a token to its row.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::traits::EmbeddingLookup;
use super::vector::{cosine_similarity, widen};
use crate::error::ConfigError;

/// An in-memory word-vector table.
#[derive(Debug, Clone)]
pub struct WordVectors {
    dim: usize,
    words: Vec<String>,
    index: HashMap<String, usize>,
    data: Vec<f32>,
}

impl WordVectors {
    /// Load a word2vec text file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let vectors = Self::from_reader(BufReader::new(file), path)?;

        info!(
            words = vectors.len(),
            dim = vectors.dim,
            path = %path.display(),
            "Loaded word vectors"
        );

        Ok(vectors)
    }

    /// Parse word2vec text from any reader. `origin` is only used in errors.
    pub fn from_reader<R: BufRead>(reader: R, origin: &Path) -> Result<Self, ConfigError> {
        let malformed = |line: usize, message: String| ConfigError::Malformed {
            path: origin.to_path_buf(),
            line,
            message,
        };

        let mut dim: Option<usize> = None;
        let mut declared_rows: Option<usize> = None;
        let mut table = Builder::default();
        let mut first_content = true;

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line.map_err(|source| ConfigError::Io {
                path: origin.to_path_buf(),
                source,
            })?;
            let line = if i == 0 {
                line.trim_start_matches('\u{feff}')
            } else {
                line.as_str()
            };

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }

            // The optional `count dim` header sits on the first non-blank line
            let header_candidate = std::mem::replace(&mut first_content, false);
            if header_candidate && fields.len() == 2 {
                if let (Ok(rows), Ok(d)) = (fields[0].parse::<usize>(), fields[1].parse::<usize>()) {
                    declared_rows = Some(rows);
                    dim = Some(d);
                    continue;
                }
            }

            let d = *dim.get_or_insert(fields.len() - 1);
            if d == 0 {
                return Err(malformed(line_no, "vectors must have at least one component".into()));
            }
            if fields.len() < d + 1 {
                return Err(malformed(
                    line_no,
                    format!("expected a token and {d} values, found {} fields", fields.len()),
                ));
            }

            let split = fields.len() - d;
            let token = fields[..split].join(" ");

            let mut row = Vec::with_capacity(d);
            for raw in &fields[split..] {
                let value: f32 = raw
                    .parse()
                    .ok()
                    .filter(|v: &f32| v.is_finite())
                    .ok_or_else(|| malformed(line_no, format!("invalid number `{raw}`")))?;
                row.push(value);
            }

            if !table.push(token.clone(), &row) {
                warn!(token = %token, line = line_no, "Duplicate vocabulary entry, keeping the first");
            }
        }

        let dim = match dim {
            Some(d) if !table.words.is_empty() => d,
            _ => return Err(malformed(1, "file contains no vectors".into())),
        };

        if let Some(rows) = declared_rows {
            if rows != table.words.len() {
                warn!(
                    declared = rows,
                    found = table.words.len(),
                    "Header row count disagrees with the file body"
                );
            }
        }

        Ok(table.finish(dim))
    }

    /// Build a table from explicit entries. Every vector must have `dim` values.
    pub fn from_entries<S, I>(dim: usize, entries: I) -> Result<Self, ConfigError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<f32>)>,
    {
        let mut table = Builder::default();
        for (i, (word, row)) in entries.into_iter().enumerate() {
            let word = word.into();
            if row.len() != dim {
                return Err(ConfigError::Malformed {
                    path: PathBuf::from("<memory>"),
                    line: i + 1,
                    message: format!("`{word}` has {} values, expected {dim}", row.len()),
                });
            }
            table.push(word, &row);
        }
        Ok(table.finish(dim))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// The `top_n` vocabulary entries most cosine-similar to `word`.
    ///
    /// Returns `None` when `word` is not in the vocabulary. Zero-norm rows
    /// have no direction and are skipped.
    pub fn nearest(&self, word: &str, top_n: usize) -> Option<Vec<(String, f64)>> {
        let &probe_idx = self.index.get(word)?;
        let probe = widen(self.row(probe_idx));

        let mut scored: Vec<(usize, f64)> = (0..self.words.len())
            .filter(|&i| i != probe_idx)
            .filter_map(|i| {
                cosine_similarity(&probe, &widen(self.row(i)))
                    .ok()
                    .map(|sim| (i, sim))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_n);

        Some(
            scored
                .into_iter()
                .map(|(i, sim)| (self.words[i].clone(), sim))
                .collect(),
        )
    }
}

impl EmbeddingLookup for WordVectors {
    fn lookup(&self, token: &str) -> Option<&[f32]> {
        self.index.get(token).map(|&i| self.row(i))
    }

    fn dimensionality(&self) -> usize {
        self.dim
    }
}

#[derive(Default)]
struct Builder {
    words: Vec<String>,
    index: HashMap<String, usize>,
    data: Vec<f32>,
}

impl Builder {
    /// Append a row. Returns false (and keeps the old row) for a repeated token.
    fn push(&mut self, word: String, row: &[f32]) -> bool {
        if self.index.contains_key(&word) {
            return false;
        }
        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.data.extend_from_slice(row);
        true
    }

    fn finish(self, dim: usize) -> WordVectors {
        WordVectors {
            dim,
            words: self.words,
            index: self.index,
            data: self.data,
        }
    }
}
