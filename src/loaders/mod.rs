// src/loaders/mod.rs - Shared CSV reading for the source exports
pub mod finance;
pub mod ideology;
pub mod kff;
pub mod population;
pub mod religion;

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: no header row found")]
    MissingHeader { path: PathBuf },

    #[error("no input files found under {0}")]
    NoInputFiles(PathBuf),

    #[error("failed to read {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Lowercased header with all whitespace removed, so "Contributions \nfrom PACs" and
/// "Contributions from PACs" compare equal.
pub fn compact_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Where the header sits in an export and where its data stops.
#[derive(Debug, Clone, Copy)]
pub struct TableLayout<'a> {
    /// First row containing a cell equal to this (compared with [`compact_header`]) is the header.
    pub header_marker: &'a str,
    /// Stop at the first single-cell row after the data; footnotes follow it.
    pub stop_at_footer: bool,
}

/// A CSV export with its preamble removed.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn read(path: &Path, layout: TableLayout<'_>) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|source| LoadError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        let marker = compact_header(layout.header_marker);
        let mut headers: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for record in reader.records() {
            let record = record.map_err(|source| LoadError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            let values: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            if headers.is_none() {
                if values.iter().any(|v| compact_header(v) == marker) {
                    headers = Some(values);
                }
                continue;
            }
            if values.iter().all(|v| v.is_empty()) {
                continue;
            }
            if layout.stop_at_footer && values.len() == 1 && !rows.is_empty() {
                break;
            }
            rows.push(values);
        }

        let headers = headers.ok_or_else(|| LoadError::MissingHeader {
            path: path.to_path_buf(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn find_column(&self, name: &str) -> Option<usize> {
        let wanted = compact_header(name);
        self.headers.iter().position(|h| compact_header(h) == wanted)
    }

    pub fn require(&self, name: &str) -> Result<usize, LoadError> {
        self.find_column(name).ok_or_else(|| LoadError::MissingColumn {
            path: self.path.clone(),
            column: name.to_string(),
        })
    }
}

/// Cell text, or `None` when absent or blank.
pub fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str).filter(|v| !v.is_empty())
}

/// Parses figures like "1,234", "$1,234.50" or "(250)" (negative).
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let (negative, body) = match trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };
    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Whole-number cell that may have been exported as a float ("3.0").
pub fn parse_int(raw: &str) -> Option<i32> {
    parse_number(raw).map(|v| v as i32)
}

/// Survey shares like "12%" or "< 1%" as fractions. Bare numbers pass through.
pub fn parse_percent(raw: &str) -> Option<f64> {
    if raw.contains('%') {
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, '%' | '<' | ' '))
            .collect();
        parse_number(&cleaned).map(|v| v / 100.0)
    } else {
        parse_number(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_compact_header() {
        assert_eq!(
            compact_header("Contributions\nfrom PACs and\nOther Committees"),
            compact_header("Contributions from PACs and Other Committees")
        );
        assert_eq!(compact_header(" Cash On Hand "), "cashonhand");
    }

    #[test]
    fn test_read_skips_preamble_and_footer() {
        let file = write_csv(
            "\"Poverty Rate by Age\"\n\"Timeframe: 2019\"\nLocation,Children 0-18,Footnotes\nUnited States,0.17,\nOhio,0.19,1\n\nNotes\n\"Some, footnote\"\n",
        );
        let table = RawTable::read(
            file.path(),
            TableLayout {
                header_marker: "Location",
                stop_at_footer: true,
            },
        )
        .unwrap();

        assert_eq!(table.headers, vec!["Location", "Children 0-18", "Footnotes"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][0], "Ohio");
        assert_eq!(table.require("children 0-18").unwrap(), 1);
        assert!(matches!(
            table.require("Total"),
            Err(LoadError::MissingColumn { ref column, .. }) if column == "Total"
        ));
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let file = write_csv("a,b\n1,2\n");
        let err = RawTable::read(
            file.path(),
            TableLayout {
                header_marker: "Candidate",
                stop_at_footer: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader { .. }));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,234"), Some(1234.0));
        assert_eq!(parse_number("$1,234.50"), Some(1234.5));
        assert_eq!(parse_number("(250)"), Some(-250.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("N/A"), None);
        assert_eq!(parse_int("3.0"), Some(3));
        assert_eq!(parse_int("00"), Some(0));
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("12%"), Some(0.12));
        assert_eq!(parse_percent("5%"), Some(0.05));
        assert_eq!(parse_percent("< 1%"), Some(0.01));
        assert_eq!(parse_percent("0.3"), Some(0.3));
        assert_eq!(parse_percent(""), None);
    }
}
