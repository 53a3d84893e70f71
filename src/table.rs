// Minimal CSV reading and writing for the keyword table and corpus files.
//
// Handles what spreadsheet exports actually produce: a UTF-8 BOM, CRLF line
// endings, quoted fields containing commas or newlines, and doubled quotes
// inside quoted fields. The first record is always the header row.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// One data record and the line it starts on (1-based, header is line 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// A parsed CSV document.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl CsvTable {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut records = parse_records(text)?.into_iter();
        let headers = match records.next() {
            Some(header) => header.fields.into_iter().map(|h| h.trim().to_string()).collect(),
            None => Vec::new(),
        };
        Ok(Self {
            headers,
            records: records.collect(),
        })
    }

    /// Index of a column by name (case-insensitive).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Field `col` of `record`, or "" when the record is short.
    pub fn field<'a>(record: &'a Record, col: Option<usize>) -> &'a str {
        col.and_then(|c| record.fields.get(c))
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn parse_records(text: &str) -> Result<Vec<Record>, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut was_quoted = false;
    let mut line = 1;
    let mut record_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !was_quoted => {
                in_quotes = true;
                was_quoted = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                was_quoted = false;
            }
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                was_quoted = false;
                push_record(&mut records, std::mem::take(&mut fields), record_line);
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ParseError {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }

    if !field.is_empty() || !fields.is_empty() || was_quoted {
        fields.push(field);
        push_record(&mut records, fields, record_line);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<Record>, fields: Vec<String>, line: usize) {
    // Blank lines parse as a single empty field
    if fields.len() == 1 && fields[0].is_empty() {
        return;
    }
    records.push(Record { line, fields });
}

/// Append one CSV record (with trailing newline) to `out`.
pub fn write_record<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, f) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let f = f.as_ref();
        if f.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&f.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(f);
        }
    }
    out.push('\n');
}
