//! Terminal output for the report commands
//!
//! Formatters only: main.rs loads the data and picks table or JSON output.

use chargeboard_core::analytics::{HeatmapQuery, HeatmapSummary};
use chargeboard_core::models::calendar::{weekday_name, DISPLAY_ORDER, HOUR_LABELS};
use chargeboard_core::{ContractOverview, LoadReport, OccupancyMatrix};
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

// ============================================================================
// Heatmap
// ============================================================================

/// Matrix as a table: one row per weekday (display order), one column per hour
pub fn format_heatmap_table(matrix: &OccupancyMatrix, no_color: bool) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![header_cell("Day", no_color)];
    header.extend(HOUR_LABELS.iter().map(|h| header_cell(h, no_color)));
    table.set_header(header);

    let peak = matrix.max();
    for (day, row) in DISPLAY_ORDER.iter().zip(matrix.rows()) {
        let mut cells = vec![Cell::new(short_day(weekday_name(*day)))];
        for &count in row {
            let cell = Cell::new(count);
            let cell = if !no_color && peak > 0 && count == peak {
                cell.fg(Color::Red)
            } else if !no_color && count > 0 {
                cell.fg(Color::Blue)
            } else {
                cell
            };
            cells.push(cell);
        }
        table.add_row(Row::from(cells));
    }

    table.to_string()
}

/// One-paragraph description of the query and its result
pub fn format_heatmap_summary(query: &HeatmapQuery, summary: &HeatmapSummary) -> String {
    let mut lines = vec![];
    lines.push(format!("Contract:         {}", query.contract));
    lines.push(format!(
        "Window:           {} .. {} (exclusive)",
        query.window.start().format("%Y-%m-%d %H:%M %Z"),
        query.window.end().format("%Y-%m-%d %H:%M:%S %Z")
    ));
    lines.push(format!("Sessions:         {}", summary.sessions));
    lines.push(format!("Session-hours:    {}", summary.session_hours));
    lines.push(format!("Busiest cell:     {}", summary.peak));
    lines.join("\n")
}

// ============================================================================
// Contracts
// ============================================================================

/// Contracts with charger and session counts (human) or JSON
pub fn format_contracts_table(
    overviews: &[ContractOverview],
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return serde_json::to_string_pretty(overviews).unwrap_or_else(|_| "[]".to_string());
    }

    if overviews.is_empty() {
        return "No contracts found.".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        header_cell("Contract", no_color),
        header_cell("Chargers", no_color),
        header_cell("Sessions", no_color),
    ]);

    for overview in overviews {
        table.add_row(Row::from(vec![
            Cell::new(&overview.name),
            Cell::new(overview.chargers),
            Cell::new(overview.sessions),
        ]));
    }

    table.to_string()
}

// ============================================================================
// Load report
// ============================================================================

/// Counters and findings of a dataset load
pub fn format_load_report(report: &LoadReport, contracts: usize) -> String {
    let (warnings, errors) = report.error_count();

    let mut lines = vec![];
    lines.push(format!("Transactions read:   {}", report.transactions_read));
    lines.push(format!("Chargers read:       {}", report.chargers_read));
    lines.push(format!("Contracts read:      {}", report.contracts_read));
    lines.push(format!("Sessions built:      {}", report.sessions_built));
    lines.push(format!("Contracts in use:    {}", contracts));
    lines.push(format!("Unmatched chargers:  {}", report.unmatched_chargers));
    lines.push(format!("Unmatched contracts: {}", report.unmatched_contracts));
    lines.push(format!("Zero-hour sessions:  {}", report.zero_duration_sessions));
    lines.push(format!("Inverted sessions:   {}", report.inverted_sessions));

    if report.errors.is_empty() {
        lines.push("Status:              OK".to_string());
    } else {
        lines.push(format!(
            "Status:              {} warning(s), {} error(s)",
            warnings, errors
        ));
        for finding in &report.errors {
            lines.push(format!("  - [{}] {}", finding.source, finding.message));
        }
    }

    lines.join("\n")
}

// ============================================================================
// Utilities
// ============================================================================

fn header_cell(label: &str, no_color: bool) -> Cell {
    if no_color {
        Cell::new(label)
    } else {
        Cell::new(label).fg(Color::Cyan)
    }
}

fn short_day(name: &str) -> &str {
    name.get(..3).unwrap_or(name)
}

// ============================================================================
// Tests
// ============================================================================
