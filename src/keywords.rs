// Keyword table: the configured polarity axes.
//
// Each row names a keyword (the target side of an axis), a comma-separated
// list of antonyms (the opposite side), a category, and optionally the
// tendency/weight columns from the original lexicon sheet. The table is
// loaded once at startup; a missing required column is fatal.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::table::CsvTable;

pub const KEYWORD_COLUMN: &str = "keyword";
pub const ANTONYM_COLUMN: &str = "antonym";
pub const CATEGORY_COLUMN: &str = "category";

/// One configured axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub keyword: String,
    /// Ordered, deduplicated, possibly empty.
    pub antonyms: Vec<String>,
    pub category: String,
    pub tendency: Option<String>,
    pub weight: Option<f64>,
}

impl KeywordConfig {
    pub fn new(keyword: &str, antonyms: &str, category: &str) -> Self {
        Self {
            keyword: keyword.trim().to_string(),
            antonyms: split_antonyms(antonyms),
            category: category.trim().to_string(),
            tendency: None,
            weight: None,
        }
    }
}

/// All configured axes, in file order, with unique keywords.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    entries: Vec<KeywordConfig>,
}

impl KeywordTable {
    /// Load the table from a CSV file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&text, path)?;
        info!(
            keywords = table.len(),
            path = %path.display(),
            "Loaded keyword table"
        );
        Ok(table)
    }

    /// Parse CSV text. `origin` is only used in errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let csv = CsvTable::parse(text).map_err(|e| ConfigError::Malformed {
            path: origin.to_path_buf(),
            line: e.line,
            message: e.message,
        })?;

        let require = |column: &'static str| {
            csv.column(column).ok_or_else(|| ConfigError::MissingColumn {
                path: origin.to_path_buf(),
                column,
            })
        };
        let keyword_col = Some(require(KEYWORD_COLUMN)?);
        let antonym_col = Some(require(ANTONYM_COLUMN)?);
        let category_col = Some(require(CATEGORY_COLUMN)?);
        let tendency_col = csv.column("tendency");
        let weight_col = csv.column("weight");

        let mut entries = Vec::new();
        for record in &csv.records {
            let mut entry = KeywordConfig::new(
                CsvTable::field(record, keyword_col),
                CsvTable::field(record, antonym_col),
                CsvTable::field(record, category_col),
            );
            if entry.keyword.is_empty() {
                continue;
            }

            let tendency = CsvTable::field(record, tendency_col).trim();
            entry.tendency = (!tendency.is_empty()).then(|| tendency.to_string());

            let weight = CsvTable::field(record, weight_col).trim();
            if !weight.is_empty() {
                entry.weight = Some(weight.parse().map_err(|_| ConfigError::Malformed {
                    path: origin.to_path_buf(),
                    line: record.line,
                    message: format!("invalid weight `{weight}`"),
                })?);
            }

            entries.push(entry);
        }

        Ok(Self::from_entries(entries))
    }

    /// Build a table, dropping blank keywords and later duplicates.
    pub fn from_entries(entries: impl IntoIterator<Item = KeywordConfig>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for mut entry in entries {
            let keyword = entry.keyword.trim();
            if keyword.is_empty() {
                continue;
            }
            if keyword.len() != entry.keyword.len() {
                entry.keyword = keyword.to_string();
            }
            if seen.insert(entry.keyword.clone()) {
                kept.push(entry);
            } else {
                warn!(keyword = %entry.keyword, "Duplicate keyword in table, keeping the first row");
            }
        }
        Self { entries: kept }
    }

    pub fn get(&self, keyword: &str) -> Option<&KeywordConfig> {
        self.entries.iter().find(|e| e.keyword == keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordConfig> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every keyword and antonym string, for tokenizer dictionary registration.
    pub fn dictionary_terms(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .flat_map(|e| std::iter::once(&e.keyword).chain(e.antonyms.iter()))
            .map(String::as_str)
            .filter(|t| seen.insert(*t))
            .collect()
    }
}

/// Split a comma-separated antonym cell into an ordered set.
pub fn split_antonyms(cell: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    cell.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .filter(|a| seen.insert(*a))
        .map(String::from)
        .collect()
}
