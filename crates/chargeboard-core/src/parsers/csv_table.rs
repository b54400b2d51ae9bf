//! Shared CSV plumbing for the three source tables
//!
//! Columns the dashboard does not use are simply not deserialized.

use crate::error::CoreError;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// A deserialized row with the 1-based line it came from
#[derive(Debug, Clone)]
pub struct Row<T> {
    pub line: u64,
    pub value: T,
}

/// Read a whole source file
pub async fn read_source(path: &Path) -> Result<String, CoreError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CoreError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CoreError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Deserialize every row of `content`, after checking the header carries
/// all `required` columns
pub fn parse_rows<T: DeserializeOwned>(
    path: &Path,
    content: &str,
    required: &[&str],
) -> Result<Vec<Row<T>>, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .clone();

    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(CoreError::MissingColumn {
                path: path.to_path_buf(),
                column: (*column).to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let value = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(path, e))?;
        rows.push(Row { line, value });
    }

    debug!(path = %path.display(), rows = rows.len(), "CSV table parsed");
    Ok(rows)
}

fn csv_error(path: &Path, source: csv::Error) -> CoreError {
    let line = source.position().map(|p| p.line()).unwrap_or(0);
    CoreError::CsvParse {
        path: path.to_path_buf(),
        line,
        message: source.to_string(),
        source,
    }
}

/// Normalize a join key
///
/// Trims whitespace; empty cells are no key at all. Integral floats written
/// by spreadsheet exports (`"12.0"`) collapse to their integer spelling so
/// they still match `"12"` on the other side of the join.
pub fn normalize_key(raw: Option<&str>) -> Option<String> {
    let key = raw?.trim();
    if key.is_empty() || key.eq_ignore_ascii_case("nan") {
        return None;
    }
    if key.contains('.') {
        if let Ok(number) = key.parse::<f64>() {
            if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
                return Some(format!("{}", number as i64));
            }
        }
    }
    Some(key.to_string())
}
