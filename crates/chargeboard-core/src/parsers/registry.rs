//! Charger and contract registry parsers
//!
//! Both registries are lookup tables for a many-to-one join, so their keys
//! must be unique. A duplicate key would fan one transaction out into
//! several sessions and is rejected at load.

use super::csv_table::{normalize_key, parse_rows, read_source};
use crate::error::CoreError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const CHARGER_COLUMNS: [&str; 2] = ["charge_box_id", "contract_id"];
const CONTRACT_COLUMNS: [&str; 2] = ["id", "name"];

#[derive(Debug, Deserialize)]
struct ChargerRow {
    charge_box_id: Option<String>,
    contract_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContractRow {
    id: Option<String>,
    name: Option<String>,
}

/// charge_box_id -> contract_id (None when the registry cell is empty)
#[derive(Debug, Clone, Default)]
pub struct ChargerRegistry {
    contracts_by_charger: HashMap<String, Option<String>>,
}

impl ChargerRegistry {
    /// Some(contract) if the charger is registered; the inner option is the
    /// contract reference, which may itself be missing
    pub fn lookup(&self, charge_box_id: &str) -> Option<Option<&str>> {
        self.contracts_by_charger
            .get(charge_box_id)
            .map(|contract| contract.as_deref())
    }

    pub fn len(&self) -> usize {
        self.contracts_by_charger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts_by_charger.is_empty()
    }
}

/// contract id -> display name
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    names_by_id: HashMap<String, Option<String>>,
}

impl ContractRegistry {
    /// Display name of a contract; None if unknown or unnamed
    pub fn name(&self, contract_id: &str) -> Option<&str> {
        self.names_by_id.get(contract_id).and_then(|n| n.as_deref())
    }

    pub fn len(&self) -> usize {
        self.names_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names_by_id.is_empty()
    }
}

/// Parser for `charge_box2.csv`
pub struct ChargerParser {
    path: PathBuf,
}

impl ChargerParser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn parse(&self) -> Result<ChargerRegistry, CoreError> {
        let content = read_source(&self.path).await?;
        self.parse_str(&content)
    }

    pub fn parse_str(&self, content: &str) -> Result<ChargerRegistry, CoreError> {
        let rows = parse_rows::<ChargerRow>(&self.path, content, &CHARGER_COLUMNS)?;
        let mut contracts_by_charger = HashMap::with_capacity(rows.len());

        for row in rows {
            // A registry row without a charger id can never be joined
            let Some(charger) = normalize_key(row.value.charge_box_id.as_deref()) else {
                continue;
            };
            let contract = normalize_key(row.value.contract_id.as_deref());
            insert_unique(&mut contracts_by_charger, &self.path, charger, contract)?;
        }

        debug!(count = contracts_by_charger.len(), "Charger registry parsed");
        Ok(ChargerRegistry {
            contracts_by_charger,
        })
    }
}

/// Parser for `contract.csv`
pub struct ContractParser {
    path: PathBuf,
}

impl ContractParser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn parse(&self) -> Result<ContractRegistry, CoreError> {
        let content = read_source(&self.path).await?;
        self.parse_str(&content)
    }

    pub fn parse_str(&self, content: &str) -> Result<ContractRegistry, CoreError> {
        let rows = parse_rows::<ContractRow>(&self.path, content, &CONTRACT_COLUMNS)?;
        let mut names_by_id = HashMap::with_capacity(rows.len());

        for row in rows {
            let Some(id) = normalize_key(row.value.id.as_deref()) else {
                continue;
            };
            let name = row.value.name.filter(|n| !n.is_empty());
            insert_unique(&mut names_by_id, &self.path, id, name)?;
        }

        debug!(count = names_by_id.len(), "Contract registry parsed");
        Ok(ContractRegistry { names_by_id })
    }
}

fn insert_unique<V>(
    map: &mut HashMap<String, V>,
    path: &Path,
    key: String,
    value: V,
) -> Result<(), CoreError> {
    if map.contains_key(&key) {
        return Err(CoreError::DuplicateKey {
            path: path.to_path_buf(),
            key,
        });
    }
    map.insert(key, value);
    Ok(())
}
