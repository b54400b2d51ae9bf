//! Parsers for the three CSV sources

pub mod csv_table;
pub mod registry;
pub mod transactions;

pub use registry::{ChargerParser, ChargerRegistry, ContractParser, ContractRegistry};
pub use transactions::{parse_timestamp, Transaction, TransactionParser, TIMESTAMP_FORMAT};
