//! Dataset loader: parse the three tables and join them into sessions
//!
//! transactions ⟕ chargers (on charge_box_id) ⟕ contracts (on contract_id = id).
//! Left joins: an unknown charger or contract leaves the session without a
//! contract and is only counted in the `LoadReport`.

use crate::config::DashboardConfig;
use crate::error::{CoreError, LoadReport};
use crate::models::Session;
use crate::parsers::csv_table::normalize_key;
use crate::parsers::{
    ChargerParser, ChargerRegistry, ContractParser, ContractRegistry, Transaction,
    TransactionParser,
};
use chrono_tz::Tz;
use std::path::PathBuf;
use tracing::{info, warn};

/// Loads the joined session table once at startup
pub struct DatasetLoader {
    transactions_path: PathBuf,
    chargers_path: PathBuf,
    contracts_path: PathBuf,
    tz: Tz,
}

impl DatasetLoader {
    pub fn new(config: &DashboardConfig) -> Result<Self, CoreError> {
        Ok(Self {
            transactions_path: config.transactions_path(),
            chargers_path: config.chargers_path(),
            contracts_path: config.contracts_path(),
            tz: config.tz()?,
        })
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Parse all three sources and join them
    ///
    /// Any missing file, missing column, malformed timestamp or duplicate
    /// registry key aborts the load.
    pub async fn load(&self) -> Result<(Vec<Session>, LoadReport), CoreError> {
        info!(
            transactions = %self.transactions_path.display(),
            chargers = %self.chargers_path.display(),
            contracts = %self.contracts_path.display(),
            tz = %self.tz,
            "Loading charger dataset"
        );

        let transaction_parser = TransactionParser::new(&self.transactions_path);
        let charger_parser = ChargerParser::new(&self.chargers_path);
        let contract_parser = ContractParser::new(&self.contracts_path);

        let (transactions, chargers, contracts) = tokio::try_join!(
            transaction_parser.parse(),
            charger_parser.parse(),
            contract_parser.parse(),
        )?;

        let mut report = LoadReport::new();
        report.chargers_read = chargers.len();
        report.contracts_read = contracts.len();
        let sessions = join_sessions(transactions, &chargers, &contracts, self.tz, &mut report);
        report.summarize();

        for finding in report.warnings() {
            warn!(source = %finding.source, "{}", finding.message);
        }
        info!(
            transactions = report.transactions_read,
            sessions = report.sessions_built,
            unmatched_chargers = report.unmatched_chargers,
            unmatched_contracts = report.unmatched_contracts,
            "Dataset loaded"
        );

        Ok((sessions, report))
    }
}

/// Load the session table described by `config`
pub async fn load_sessions(
    config: &DashboardConfig,
) -> Result<(Vec<Session>, LoadReport), CoreError> {
    DatasetLoader::new(config)?.load().await
}

/// Join transactions with both registries and derive session fields
pub fn join_sessions(
    transactions: Vec<Transaction>,
    chargers: &ChargerRegistry,
    contracts: &ContractRegistry,
    tz: Tz,
    report: &mut LoadReport,
) -> Vec<Session> {
    report.transactions_read += transactions.len();

    let sessions: Vec<Session> = transactions
        .into_iter()
        .map(|tx| {
            let charger_key = normalize_key(Some(&tx.charge_box_id));
            let registered = charger_key.as_deref().and_then(|key| chargers.lookup(key));
            if registered.is_none() {
                report.unmatched_chargers += 1;
            }
            let contract_id = registered.flatten().map(str::to_string);
            let contract_name = contract_id
                .as_deref()
                .and_then(|id| contracts.name(id))
                .map(str::to_string);
            if registered.is_some() && contract_name.is_none() {
                report.unmatched_contracts += 1;
            }
            if tx.stop_utc < tx.start_utc {
                report.inverted_sessions += 1;
            }

            let session = Session::from_utc(
                charger_key.unwrap_or(tx.charge_box_id),
                contract_id,
                contract_name,
                tx.start_utc,
                tx.stop_utc,
                tz,
            );
            if session.duration_hours == 0 {
                report.zero_duration_sessions += 1;
            }
            session
        })
        .collect();

    report.sessions_built += sessions.len();
    sessions
}
