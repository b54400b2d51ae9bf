//! Dashboard configuration
//!
//! Read from an optional TOML file; every field has a default so an empty
//! file (or no file) yields a working setup for the bundled `data/` layout.

use crate::error::CoreError;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for loading and presenting the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the three CSV sources
    pub data_dir: PathBuf,
    /// Transaction history file name (relative to `data_dir`)
    pub transactions_file: String,
    /// Charger registry file name
    pub chargers_file: String,
    /// Contract registry file name
    pub contracts_file: String,
    /// IANA zone the UTC timestamps are converted to
    pub timezone: String,
    /// Page title
    pub title: String,
    /// Date picker initial range and bounds
    pub dates: DateBounds,
}

/// Bounds and defaults of the date range control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateBounds {
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl Default for DateBounds {
    fn default() -> Self {
        Self {
            default_start: ymd(2022, 12, 1),
            default_end: ymd(2024, 10, 31),
            min_date: ymd(2022, 1, 1),
            max_date: ymd(2024, 12, 31),
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            transactions_file: "transactions_history.csv".to_string(),
            chargers_file: "charge_box2.csv".to_string(),
            contracts_file: "contract.csv".to_string(),
            timezone: "America/New_York".to_string(),
            title: "CityVitae Contract Dashboard".to_string(),
            dates: DateBounds::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
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
        })?;
        Self::from_toml(&content)
    }

    /// Parse TOML text and validate it
    pub fn from_toml(content: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(content).map_err(|e| CoreError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the dashboard cannot run with
    pub fn validate(&self) -> Result<(), CoreError> {
        self.tz()?;
        let dates = &self.dates;
        if dates.min_date > dates.max_date {
            return Err(CoreError::InvalidConfig {
                message: format!(
                    "min_date {} is after max_date {}",
                    dates.min_date, dates.max_date
                ),
            });
        }
        Ok(())
    }

    /// Parsed time zone
    pub fn tz(&self) -> Result<Tz, CoreError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| CoreError::UnknownTimeZone {
                name: self.timezone.clone(),
            })
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.data_dir.join(&self.transactions_file)
    }

    pub fn chargers_path(&self) -> PathBuf {
        self.data_dir.join(&self.chargers_file)
    }

    pub fn contracts_path(&self) -> PathBuf {
        self.data_dir.join(&self.contracts_file)
    }
}
