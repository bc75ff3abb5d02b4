//! Keyword ingestion from pasted text, CSV and XLSX files.
//!
//! Every cell of the input is a candidate keyword: cells are flattened in
//! row order, trimmed, and empty ones are dropped. No header row is assumed.

use std::fs;
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::types::{AdForgeError, Result};

/// Input file formats accepted for keyword upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordFileType {
    Csv,
    Xlsx,
}

impl KeywordFileType {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx") => Ok(Self::Xlsx),
            _ => Err(AdForgeError::UnsupportedFileType(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            )),
        }
    }
}

/// Read keywords from a `.csv` or `.xlsx` file.
pub fn parse_keywords_from_file(path: &Path) -> Result<Vec<String>> {
    let file_type = KeywordFileType::from_path(path)?;

    if fs::metadata(path)?.len() == 0 {
        return Err(AdForgeError::Ingest(format!(
            "File is empty: {}",
            path.display()
        )));
    }

    let keywords = match file_type {
        KeywordFileType::Csv => parse_csv(&fs::read(path)?)?,
        KeywordFileType::Xlsx => parse_xlsx(path)?,
    };

    debug!(path = %path.display(), count = keywords.len(), "Parsed keyword file");
    Ok(keywords)
}

/// Split pasted text into keywords, one per line.
pub fn parse_keyword_text(text: &str) -> Vec<String> {
    text.lines().filter_map(clean).collect()
}

fn parse_csv(content: &[u8]) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content);

    let mut keywords = Vec::new();
    for record in reader.records() {
        let record = record?;
        keywords.extend(record.iter().filter_map(clean));
    }
    Ok(keywords)
}

fn parse_xlsx(path: &Path) -> Result<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AdForgeError::Ingest("Workbook has no sheets".to_string()))??;

    Ok(range
        .rows()
        .flat_map(|row| row.iter())
        .filter_map(|cell| clean(&cell_to_string(cell)))
        .collect())
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Float(value) => value.to_string(),
        DataType::Int(value) => value.to_string(),
        DataType::Bool(value) => value.to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}

fn clean(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_keyword_text() {
        let keywords = parse_keyword_text("custom t-shirts\n\n  bulk tees  \r\n\t\nprint shop");
        assert_eq!(keywords, vec!["custom t-shirts", "bulk tees", "print shop"]);
    }

    #[test]
    fn test_csv_flattens_rows_and_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "kw.csv", "a, b\n\n c ,,d\n\"e, f\"\n");

        let keywords = parse_keywords_from_file(&path).unwrap();
        assert_eq!(keywords, vec!["a", "b", "c", "d", "e, f"]);
    }

    #[test]
    fn test_xlsx_reads_first_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kw.xlsx");

        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.write_string(0, 0, "custom t-shirts").unwrap();
        first.write_string(0, 1, "  ").unwrap();
        first.write_string(1, 1, " bulk tees ").unwrap();
        first.write_number(2, 0, 500.0).unwrap();
        let second = workbook.add_worksheet();
        second.write_string(0, 0, "ignored").unwrap();
        workbook.save(&path).unwrap();

        let keywords = parse_keywords_from_file(&path).unwrap();
        assert_eq!(keywords, vec!["custom t-shirts", "bulk tees", "500"]);
    }

    #[test]
    fn test_uppercase_extension_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "KW.CSV", "one\ntwo\n");
        assert_eq!(parse_keywords_from_file(&path).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "kw.txt", "one\n");

        match parse_keywords_from_file(&path) {
            Err(err @ AdForgeError::UnsupportedFileType(_)) => {
                assert_eq!(
                    err.to_string(),
                    "Unsupported file type. Please upload a CSV or XLSX file. (got kw.txt)"
                );
            }
            other => panic!("expected unsupported file type, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "kw.csv", "");
        assert!(matches!(
            parse_keywords_from_file(&path),
            Err(AdForgeError::Ingest(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(
            parse_keywords_from_file(&path),
            Err(AdForgeError::Io(_))
        ));
    }
}
