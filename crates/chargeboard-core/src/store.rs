//! Immutable session store
//!
//! Built once at startup from the joined dataset and shared as
//! `Arc<DataStore>`. Nothing in it changes afterwards: every heatmap is a
//! fresh scan over the sorted session table.

use crate::analytics::{aggregate_with_summary, HeatmapQuery, HeatmapSummary};
use crate::config::DashboardConfig;
use crate::error::{CoreError, LoadReport};
use crate::loader::DatasetLoader;
use crate::models::{OccupancyMatrix, Session};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-contract numbers for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractOverview {
    pub name: String,
    pub chargers: usize,
    pub sessions: usize,
}

/// Central read-only data store for the dashboard
pub struct DataStore {
    config: DashboardConfig,
    tz: Tz,

    /// Sorted by start time; Arc for cheap sharing with callers
    sessions: Vec<Arc<Session>>,

    /// Distinct contract names, in order of first appearance in the history
    contracts: Vec<String>,

    /// Contract name -> distinct chargers, in order of first appearance
    chargers_by_contract: HashMap<String, Vec<String>>,

    /// Contract name -> session count
    sessions_by_contract: HashMap<String, usize>,
}

impl DataStore {
    /// Build from already-joined sessions (source order)
    pub fn from_sessions(
        config: DashboardConfig,
        sessions: Vec<Session>,
    ) -> Result<Self, CoreError> {
        let tz = config.tz()?;

        let mut contracts = Vec::new();
        let mut chargers_by_contract: HashMap<String, Vec<String>> = HashMap::new();
        let mut sessions_by_contract: HashMap<String, usize> = HashMap::new();

        for session in &sessions {
            let Some(name) = session.contract_name.as_deref() else {
                continue;
            };
            let count = sessions_by_contract.entry(name.to_string()).or_default();
            if *count == 0 {
                contracts.push(name.to_string());
            }
            *count += 1;

            let chargers = chargers_by_contract.entry(name.to_string()).or_default();
            if !chargers.contains(&session.charger_id) {
                chargers.push(session.charger_id.clone());
            }
        }

        let mut sessions: Vec<Arc<Session>> = sessions.into_iter().map(Arc::new).collect();
        sessions.sort_by_key(|s| s.start_time);

        debug!(
            sessions = sessions.len(),
            contracts = contracts.len(),
            "Session store built"
        );

        Ok(Self {
            config,
            tz,
            sessions,
            contracts,
            chargers_by_contract,
            sessions_by_contract,
        })
    }

    /// Load the dataset described by `config` and build the store
    pub async fn load(config: DashboardConfig) -> Result<(Self, LoadReport), CoreError> {
        let loader = DatasetLoader::new(&config)?;
        let (sessions, report) = loader.load().await?;
        let store = Self::from_sessions(config, sessions)?;

        info!(
            sessions = store.session_count(),
            contracts = store.contracts.len(),
            "Data store ready"
        );
        Ok((store, report))
    }

    // ===================
    // Read accessors
    // ===================

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// All sessions, sorted by start time
    pub fn sessions(&self) -> &[Arc<Session>] {
        &self.sessions
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Distinct contract names for the selector
    pub fn contracts(&self) -> &[String] {
        &self.contracts
    }

    /// Contract preselected in the dropdown (the first one seen)
    pub fn default_contract(&self) -> Option<&str> {
        self.contracts.first().map(String::as_str)
    }

    pub fn has_contract(&self, name: &str) -> bool {
        self.sessions_by_contract.contains_key(name)
    }

    /// Chargers used under a contract; None for an unknown contract
    pub fn chargers_for(&self, contract: &str) -> Option<&[String]> {
        self.chargers_by_contract
            .get(contract)
            .map(Vec::as_slice)
    }

    /// Contracts with their charger and session counts
    pub fn contract_overviews(&self) -> Vec<ContractOverview> {
        self.contracts
            .iter()
            .map(|name| ContractOverview {
                name: name.clone(),
                chargers: self.chargers_by_contract.get(name).map_or(0, Vec::len),
                sessions: self.sessions_by_contract.get(name).copied().unwrap_or(0),
            })
            .collect()
    }

    /// First and last session start
    pub fn time_span(&self) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
        Some((
            self.sessions.first()?.start_time,
            self.sessions.last()?.start_time,
        ))
    }

    // ===================
    // Queries
    // ===================

    /// Occupancy matrix and summary for one contract and date window
    pub fn heatmap(&self, query: &HeatmapQuery) -> (OccupancyMatrix, HeatmapSummary) {
        if query.window.is_empty() {
            return (OccupancyMatrix::zeros(), HeatmapSummary::default());
        }

        // Sessions are sorted, so the window is a contiguous slice
        let lo = self
            .sessions
            .partition_point(|s| s.start_time < query.window.start());
        let hi = self
            .sessions
            .partition_point(|s| s.start_time < query.window.end());

        let (matrix, summary) = aggregate_with_summary(&self.sessions[lo..hi], query);
        debug!(
            contract = %query.contract,
            sessions = summary.sessions,
            session_hours = summary.session_hours,
            "Heatmap computed"
        );
        (matrix, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{aggregate, DateWindow};
    use chrono::{NaiveDate, NaiveDateTime, Weekday};

    fn utc(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn session(charger: &str, contract: Option<&str>, start: &str, stop: &str) -> Session {
        Session::from_utc(
            charger.to_string(),
            contract.map(|_| "1".to_string()),
            contract.map(str::to_string),
            utc(start),
            utc(stop),
            chrono_tz::America::New_York,
        )
    }

    fn store() -> DataStore {
        let sessions = vec![
            session("CB-2", Some("Beta"), "2024-10-09 18:00", "2024-10-09 20:00"),
            session("CB-1", Some("Acme"), "2024-10-08 03:00", "2024-10-08 05:00"),
            session("CB-3", Some("Acme"), "2024-10-01 12:00", "2024-10-01 13:00"),
            session("CB-1", Some("Acme"), "2024-10-02 12:00", "2024-10-02 13:00"),
            session("CB-9", None, "2024-10-02 12:00", "2024-10-02 16:00"),
        ];
        DataStore::from_sessions(DashboardConfig::default(), sessions).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_contracts_in_first_appearance_order() {
        let store = store();
        assert_eq!(store.contracts(), &["Beta".to_string(), "Acme".to_string()]);
        assert_eq!(store.default_contract(), Some("Beta"));
        assert!(store.has_contract("Acme"));
        assert!(!store.has_contract("Nobody"));
    }

    #[test]
    fn test_chargers_per_contract() {
        let store = store();
        assert_eq!(
            store.chargers_for("Acme").unwrap(),
            &["CB-1".to_string(), "CB-3".to_string()]
        );
        assert_eq!(store.chargers_for("Nobody"), None);

        let overviews = store.contract_overviews();
        assert_eq!(overviews[1].name, "Acme");
        assert_eq!(overviews[1].chargers, 2);
        assert_eq!(overviews[1].sessions, 3);
    }

    #[test]
    fn test_sessions_sorted_and_unmatched_kept() {
        let store = store();
        assert_eq!(store.session_count(), 5);
        let starts: Vec<_> = store.sessions().iter().map(|s| s.start_time).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);

        let (first, last) = store.time_span().unwrap();
        assert!(first <= last);
    }

    #[test]
    fn test_heatmap_matches_full_scan() {
        let store = store();
        let query = HeatmapQuery::new(
            "Acme",
            DateWindow::from_dates(date(2024, 10, 2), date(2024, 10, 31), store.tz()),
        );
        let (matrix, summary) = store.heatmap(&query);

        assert_eq!(matrix, aggregate(store.sessions(), &query));
        // 2024-10-08 03:00 UTC is Monday 23:00 in New York
        assert_eq!(matrix.get(Weekday::Mon, 23), 1);
        assert_eq!(matrix.get(Weekday::Tue, 0), 1);
        assert_eq!(summary.sessions, 2);
        assert_eq!(summary.session_hours, 3);
    }

    #[test]
    fn test_heatmap_inverted_window() {
        let store = store();
        let query = HeatmapQuery::new(
            "Acme",
            DateWindow::from_dates(date(2024, 10, 31), date(2024, 10, 1), store.tz()),
        );
        let (matrix, summary) = store.heatmap(&query);
        assert!(matrix.is_empty());
        assert_eq!(summary.sessions, 0);
    }

    #[test]
    fn test_bad_timezone_rejected() {
        let config = DashboardConfig {
            timezone: "Nowhere/Special".to_string(),
            ..DashboardConfig::default()
        };
        assert!(DataStore::from_sessions(config, Vec::new()).is_err());
    }
}
