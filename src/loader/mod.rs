//! Survey export loading.
//!
//! Picks the input file, decodes it (UTF-8 with a Latin-1 fallback) and
//! parses it into a [`Table`].

use crate::config::InputConfig;
use crate::models::Table;
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while locating or parsing the survey export.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Neither the cleaned nor the raw export exists.
    #[error("CSV not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A data row has more fields than the header.
    #[error("malformed CSV: record {record} has {found} fields, header has {expected}")]
    Malformed {
        record: usize,
        expected: usize,
        found: usize,
    },
}

/// Text encoding the export was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "UTF-8"),
            Encoding::Latin1 => write!(f, "Latin-1"),
        }
    }
}

/// A loaded export together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub path: PathBuf,
    pub encoding: Encoding,
    pub table: Table,
}

/// Pick the file to read: the cleaned export if it exists, else the raw one.
///
/// Fails with [`LoadError::NotFound`] naming the raw path when neither exists.
pub fn select_input(input: &InputConfig) -> Result<PathBuf, LoadError> {
    if input.clean_csv.exists() {
        debug!("Using cleaned export: {}", input.clean_csv.display());
        return Ok(input.clean_csv.clone());
    }

    if input.raw_csv.exists() {
        debug!(
            "Cleaned export missing ({}), using raw export",
            input.clean_csv.display()
        );
        return Ok(input.raw_csv.clone());
    }

    Err(LoadError::NotFound(input.raw_csv.clone()))
}

/// Decode raw bytes as UTF-8, falling back to Latin-1.
///
/// A leading UTF-8 byte order mark is dropped.
pub fn decode(bytes: &[u8]) -> (String, Encoding) {
    let bytes_no_bom = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    match std::str::from_utf8(bytes_no_bom) {
        Ok(text) => (text.to_string(), Encoding::Utf8),
        Err(e) => {
            warn!("Input is not valid UTF-8 ({}), decoding as Latin-1", e);
            // Latin-1 maps every byte to the code point of the same value.
            let text = bytes.iter().map(|&b| char::from(b)).collect();
            (text, Encoding::Latin1)
        }
    }
}

/// Parse comma-separated text with a header row into a [`Table`].
///
/// Headers are trimmed. Rows shorter than the header get absent trailing
/// cells; longer rows are rejected.
pub fn parse_table(text: &str) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(String::from)
        .collect();
    let expected = headers.len();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx + 1))?;

        if record.len() > expected {
            return Err(LoadError::Malformed {
                record: idx + 1,
                expected,
                found: record.len(),
            }
            .into());
        }

        rows.push(record.iter().map(|cell| Some(cell.to_string())).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Read, decode and parse the file at `path`.
pub fn load_file(path: &Path) -> Result<LoadedTable> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let (text, encoding) = decode(&bytes);
    let table =
        parse_table(&text).with_context(|| format!("Failed to parse {}", path.display()))?;

    info!(
        "Loaded {} ({}, {} rows, {} columns)",
        path.display(),
        encoding,
        table.row_count(),
        table.headers().len()
    );

    Ok(LoadedTable {
        path: path.to_path_buf(),
        encoding,
        table,
    })
}

/// Select the input file and load it.
pub fn load_table(input: &InputConfig) -> Result<LoadedTable> {
    let path = select_input(input)?;
    load_file(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn input_in(dir: &TempDir) -> InputConfig {
        InputConfig {
            clean_csv: dir.path().join("clean.csv"),
            raw_csv: dir.path().join("raw.csv"),
        }
    }

    #[test]
    fn test_select_prefers_clean() {
        let dir = TempDir::new().unwrap();
        let input = input_in(&dir);
        fs::write(&input.clean_csv, "a\n1\n").unwrap();
        fs::write(&input.raw_csv, "a\n2\n").unwrap();

        assert_eq!(select_input(&input).unwrap(), input.clean_csv);
    }

    #[test]
    fn test_select_falls_back_to_raw() {
        let dir = TempDir::new().unwrap();
        let input = input_in(&dir);
        fs::write(&input.raw_csv, "a\n2\n").unwrap();

        assert_eq!(select_input(&input).unwrap(), input.raw_csv);
    }

    #[test]
    fn test_select_missing_names_raw_path() {
        let dir = TempDir::new().unwrap();
        let input = input_in(&dir);

        let err = select_input(&input).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(ref p) if p == &input.raw_csv));
        assert!(err.to_string().contains("raw.csv"));
    }

    #[test]
    fn test_decode_utf8() {
        let (text, encoding) = decode("¿Edad?".as_bytes());
        assert_eq!(text, "¿Edad?");
        assert_eq!(encoding, Encoding::Utf8);
    }

    #[test]
    fn test_decode_strips_bom() {
        let (text, encoding) = decode(b"\xEF\xBB\xBFage\n");
        assert_eq!(text, "age\n");
        assert_eq!(encoding, Encoding::Utf8);
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "¿Qué?" in Latin-1
        let (text, encoding) = decode(&[0xBF, b'Q', b'u', 0xE9, b'?']);
        assert_eq!(text, "¿Qué?");
        assert_eq!(encoding, Encoding::Latin1);
    }

    #[test]
    fn test_parse_table_trims_headers_and_keeps_cells() {
        let table = parse_table(" age , ticket \n18-24,Paper\n,\"Digital, email\"\n").unwrap();
        assert_eq!(table.headers(), &["age".to_string(), "ticket".to_string()]);
        assert_eq!(table.row_count(), 2);

        let ticket: Vec<_> = table.column("ticket").unwrap().collect();
        assert_eq!(ticket, vec![Some("Paper"), Some("Digital, email")]);
        let age: Vec<_> = table.column("age").unwrap().collect();
        assert_eq!(age, vec![Some("18-24"), Some("")]);
    }

    #[test]
    fn test_parse_table_short_row_has_absent_cells() {
        let table = parse_table("a,b\n1\n").unwrap();
        let b: Vec<_> = table.column("b").unwrap().collect();
        assert_eq!(b, vec![None]);
    }

    #[test]
    fn test_parse_table_rejects_long_row() {
        let err = parse_table("a,b\n1,2,3\n").unwrap_err();
        let load_err = err.downcast_ref::<LoadError>().unwrap();
        assert!(matches!(
            load_err,
            LoadError::Malformed {
                record: 1,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_load_file_latin1() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw.csv");
        let mut bytes = b"edad\n".to_vec();
        bytes.extend_from_slice(&[b'm', 0xE1, b's', b'\n']);
        fs::write(&path, bytes).unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.encoding, Encoding::Latin1);
        let cells: Vec<_> = loaded.table.column("edad").unwrap().collect();
        assert_eq!(cells, vec![Some("más")]);
    }

    #[test]
    fn test_load_table_uses_clean_content() {
        let dir = TempDir::new().unwrap();
        let input = input_in(&dir);
        fs::write(&input.clean_csv, "age\nclean\n").unwrap();
        fs::write(&input.raw_csv, "age\nraw\n").unwrap();

        let loaded = load_table(&input).unwrap();
        assert_eq!(loaded.path, input.clean_csv);
        let cells: Vec<_> = loaded.table.column("age").unwrap().collect();
        assert_eq!(cells, vec![Some("clean")]);
    }
}
