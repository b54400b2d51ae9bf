//! chargeboard - EV charger usage dashboard

mod cli;

use anyhow::{bail, Context, Result};
use chargeboard_core::analytics::{parse_date, DateWindow, HeatmapQuery};
use chargeboard_core::{DashboardConfig, DataStore, HeatmapFigure, LoadReport};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chargeboard",
    version,
    about = "EV charger usage dashboard",
    long_about = "Interactive heatmap of charger usage per contract, by weekday and hour.\n\
                  \n\
                  Reads the transaction history, charger registry and contract registry\n\
                  CSV files, joins them, and shows how many session-hours fall into each\n\
                  (weekday, hour) cell for a contract and date range.\n\
                  \n\
                  Examples:\n\
                    chargeboard                                   # Run web dashboard (default)\n\
                    chargeboard web --port 9000 --open            # Custom port, open browser\n\
                    chargeboard heatmap --contract Acme           # Print heatmap table\n\
                    chargeboard heatmap -c Acme --start 2024-01-01 --end 2024-03-31 --json\n\
                    chargeboard contracts                         # List contracts\n\
                    chargeboard check                             # Validate the data files\n\
                  \n\
                  Environment Variables:\n\
                    CHARGEBOARD_CONFIG               # Path to TOML config file\n\
                    CHARGEBOARD_DATA_DIR             # Directory holding the CSV files\n\
                    CHARGEBOARD_TZ                   # Display time zone (IANA name)\n\
                    CHARGEBOARD_NO_COLOR             # Disable ANSI colors (log-friendly)\n\
                    RUST_LOG                         # Log filter (default: info)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Path to TOML config file
    #[arg(long, global = true, env = "CHARGEBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the CSV files (overrides config)
    #[arg(long, global = true, env = "CHARGEBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Display time zone, e.g. America/New_York (overrides config)
    #[arg(long, global = true, env = "CHARGEBOARD_TZ")]
    tz: Option<String>,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, global = true, env = "CHARGEBOARD_NO_COLOR")]
    no_color: bool,

    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Run web dashboard (default)
    Web {
        /// Port for web server
        #[arg(long, default_value = "8050")]
        port: u16,
        /// Open the dashboard in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Print the heatmap of one contract
    Heatmap {
        /// Contract name
        #[arg(long, short = 'c')]
        contract: String,
        /// First date, YYYY-MM-DD (default from config)
        #[arg(long)]
        start: Option<String>,
        /// Last date, YYYY-MM-DD (default from config)
        #[arg(long)]
        end: Option<String>,
        /// Output the chart figure as JSON
        #[arg(long)]
        json: bool,
    },
    /// List contracts with charger and session counts
    Contracts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load the data files and report what was found
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(!cli.no_color)
        .try_init();

    let config = load_config(&cli)?;
    let no_color = cli.no_color;

    match cli.mode.unwrap_or(Mode::Web {
        port: 8050,
        open: false,
    }) {
        Mode::Web { port, open } => {
            run_web(config, port, open).await?;
        }
        Mode::Heatmap {
            contract,
            start,
            end,
            json,
        } => {
            run_heatmap(config, contract, start, end, json, no_color).await?;
        }
        Mode::Contracts { json } => {
            run_contracts(config, json, no_color).await?;
        }
        Mode::Check => {
            run_check(config).await?;
        }
    }

    Ok(())
}

/// Config file (if any) with command-line and environment overrides applied
fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(tz) = &cli.tz {
        config.timezone = tz.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn load_store(config: DashboardConfig) -> Result<(DataStore, LoadReport)> {
    let data_dir = config.data_dir.clone();
    DataStore::load(config)
        .await
        .with_context(|| format!("Failed to load charger data from {}", data_dir.display()))
}

async fn run_web(config: DashboardConfig, port: u16, open: bool) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;

    let start = Instant::now();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    spinner.set_message("Loading transactions, chargers and contracts...");
    let (store, report) = match load_store(config).await {
        Ok(loaded) => loaded,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };

    let elapsed = start.elapsed();
    spinner.finish_with_message(format!(
        "✓ Ready in {:.2}s ({} sessions, {} contracts)",
        elapsed.as_secs_f64(),
        store.session_count(),
        store.contracts().len()
    ));

    let (warnings, _) = report.error_count();
    if warnings > 0 {
        println!("  {} data warning(s), run 'chargeboard check' for details", warnings);
    }

    let url = format!("http://localhost:{}", port);
    println!("\nDashboard: {}", url);
    if open {
        if let Err(e) = open::that(&url) {
            warn!(error = %e, "Could not open browser");
        }
    }

    chargeboard_web::run(Arc::new(store), port).await
}

async fn run_heatmap(
    config: DashboardConfig,
    contract: String,
    start: Option<String>,
    end: Option<String>,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let dates = config.dates;
    let start = date_arg(start.as_deref(), dates.default_start)?;
    let end = date_arg(end.as_deref(), dates.default_end)?;

    let (store, _report) = load_store(config).await?;
    if !store.has_contract(&contract) {
        warn!(contract = %contract, "Unknown contract, the heatmap is empty");
    }

    let query = HeatmapQuery::new(contract, DateWindow::from_dates(start, end, store.tz()));
    let (matrix, summary) = store.heatmap(&query);

    if json {
        let output = serde_json::json!({
            "contract": query.contract,
            "start": start,
            "end": end,
            "summary": summary,
            "figure": HeatmapFigure::build(&matrix, None),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", cli::format_heatmap_summary(&query, &summary));
        println!();
        println!("{}", cli::format_heatmap_table(&matrix, no_color));
    }

    Ok(())
}

async fn run_contracts(config: DashboardConfig, json: bool, no_color: bool) -> Result<()> {
    let (store, _report) = load_store(config).await?;
    println!(
        "{}",
        cli::format_contracts_table(&store.contract_overviews(), json, no_color)
    );
    Ok(())
}

async fn run_check(config: DashboardConfig) -> Result<()> {
    let (store, report) = load_store(config).await?;

    println!("chargeboard - Data Check");
    println!("========================");
    println!();
    println!("{}", cli::format_load_report(&report, store.contracts().len()));

    if let Some((first, last)) = store.time_span() {
        println!();
        println!("First session:       {}", first.format("%Y-%m-%d %H:%M %Z"));
        println!("Last session:        {}", last.format("%Y-%m-%d %H:%M %Z"));
    }

    if report.has_errors() {
        let (_, errors) = report.error_count();
        bail!("{} error(s) found in the data", errors);
    }
    Ok(())
}

fn date_arg(value: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    match value {
        Some(v) => parse_date(v).with_context(|| format!("Invalid date '{}'", v)),
        None => Ok(default),
    }
}
