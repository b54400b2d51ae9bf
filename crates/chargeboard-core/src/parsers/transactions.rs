//! Transaction history parser (`transactions_history.csv`)

use super::csv_table::{parse_rows, read_source};
use crate::error::CoreError;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source timestamp layout, UTC wall clock with fractional seconds
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const REQUIRED_COLUMNS: [&str; 3] = ["charge_box_id", "start_timestamp", "stop_timestamp"];

#[derive(Debug, Deserialize)]
struct TransactionRow {
    charge_box_id: Option<String>,
    start_timestamp: Option<String>,
    stop_timestamp: Option<String>,
}

/// One charging transaction, timestamps still in UTC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Raw charger reference (may be empty)
    pub charge_box_id: String,
    pub start_utc: NaiveDateTime,
    pub stop_utc: NaiveDateTime,
}

/// Parser for the transaction history table
pub struct TransactionParser {
    path: PathBuf,
}

impl TransactionParser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole table; any malformed timestamp fails the load
    pub async fn parse(&self) -> Result<Vec<Transaction>, CoreError> {
        let content = read_source(&self.path).await?;
        self.parse_str(&content)
    }

    pub fn parse_str(&self, content: &str) -> Result<Vec<Transaction>, CoreError> {
        let rows = parse_rows::<TransactionRow>(&self.path, content, &REQUIRED_COLUMNS)?;

        let transactions = rows
            .into_iter()
            .map(|row| {
                let start_utc = self.timestamp(row.line, row.value.start_timestamp)?;
                let stop_utc = self.timestamp(row.line, row.value.stop_timestamp)?;
                Ok(Transaction {
                    charge_box_id: row.value.charge_box_id.unwrap_or_default(),
                    start_utc,
                    stop_utc,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        debug!(count = transactions.len(), "Transactions parsed");
        Ok(transactions)
    }

    fn timestamp(&self, line: u64, raw: Option<String>) -> Result<NaiveDateTime, CoreError> {
        let value = raw.unwrap_or_default();
        parse_timestamp(&value).ok_or_else(|| CoreError::MalformedTimestamp {
            path: self.path.clone(),
            line,
            value,
        })
    }
}

/// Parse a source timestamp such as `2024-10-01 13:45:07.123`
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const SAMPLE: &str = "\
transaction_pk,connector_pk,charge_box_id,id_tag,start_timestamp,stop_timestamp
1,10,CB-1,TAG,2024-10-01 13:45:07.123000,2024-10-01 15:45:07.000000
2,11,CB-2,TAG,2024-10-02 23:10:00.5,2024-10-03 01:10:00.5
";

    #[test]
    fn test_parse_transactions() {
        let parser = TransactionParser::new("transactions_history.csv");
        let txs = parser.parse_str(SAMPLE).unwrap();

        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].charge_box_id, "CB-1");
        assert_eq!(txs[0].start_utc.hour(), 13);
        assert_eq!(txs[0].start_utc.nanosecond(), 123_000_000);
        assert_eq!(txs[1].stop_utc.day(), 3);
    }

    #[test]
    fn test_malformed_timestamp_fails_whole_table() {
        let content = "\
charge_box_id,start_timestamp,stop_timestamp
CB-1,2024-10-01 13:45:07.1,2024-10-01 15:45:07.1
CB-2,01/10/2024 13:45,2024-10-01 15:45:07.1
";
        let parser = TransactionParser::new("transactions_history.csv");
        match parser.parse_str(content).unwrap_err() {
            CoreError::MalformedTimestamp { line, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(value, "01/10/2024 13:45");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_stop_timestamp_is_malformed() {
        let content = "charge_box_id,start_timestamp,stop_timestamp\nCB-1,2024-10-01 13:45:07.1,\n";
        let parser = TransactionParser::new("transactions_history.csv");
        assert!(matches!(
            parser.parse_str(content).unwrap_err(),
            CoreError::MalformedTimestamp { .. }
        ));
    }

    #[test]
    fn test_missing_timestamp_column() {
        let content = "charge_box_id,start_timestamp\nCB-1,2024-10-01 13:45:07.1\n";
        let parser = TransactionParser::new("transactions_history.csv");
        assert!(matches!(
            parser.parse_str(content).unwrap_err(),
            CoreError::MissingColumn { .. }
        ));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-10-01 13:45:07.000001").is_some());
        assert!(parse_timestamp("2024-10-01 13:45:07").is_some());
        assert!(parse_timestamp("2024-10-01T13:45:07").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
