//! Occupancy matrix: session-hours per (weekday, hour) cell

use chrono::Weekday;
use serde::Serialize;

use super::calendar::{display_row, DAYS_PER_WEEK, DISPLAY_ORDER, HOURS_PER_DAY};

/// Dense 7×24 grid of session-hour counts
///
/// Rows follow [`DISPLAY_ORDER`] (Sunday first, Monday last), columns are
/// hours 00-23. Serializes as a nested array, row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OccupancyMatrix {
    cells: [[u32; HOURS_PER_DAY]; DAYS_PER_WEEK],
}

impl Default for OccupancyMatrix {
    fn default() -> Self {
        Self::zeros()
    }
}

impl OccupancyMatrix {
    pub fn zeros() -> Self {
        Self {
            cells: [[0; HOURS_PER_DAY]; DAYS_PER_WEEK],
        }
    }

    /// Count for `day` at `hour` (hour must be < 24)
    pub fn get(&self, day: Weekday, hour: u8) -> u32 {
        self.cells[display_row(day)][hour as usize]
    }

    /// Add one session-hour to a cell
    pub fn increment(&mut self, day: Weekday, hour: u8) {
        self.cells[display_row(day)][hour as usize] += 1;
    }

    /// Rows in display order
    pub fn rows(&self) -> &[[u32; HOURS_PER_DAY]; DAYS_PER_WEEK] {
        &self.cells
    }

    /// Iterate `(weekday, hour, count)` over every cell, display order
    pub fn iter_cells(&self) -> impl Iterator<Item = (Weekday, u8, u32)> + '_ {
        DISPLAY_ORDER.iter().zip(self.cells.iter()).flat_map(|(day, row)| {
            row.iter()
                .enumerate()
                .map(move |(hour, count)| (*day, hour as u8, *count))
        })
    }

    /// Sum of all cells
    pub fn total(&self) -> u64 {
        self.cells
            .iter()
            .flatten()
            .map(|count| u64::from(*count))
            .sum()
    }

    /// Largest cell value (0 for an empty matrix)
    pub fn max(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|count| *count == 0)
    }

    /// Per-weekday totals in display order
    pub fn row_totals(&self) -> [u64; DAYS_PER_WEEK] {
        let mut totals = [0u64; DAYS_PER_WEEK];
        for (total, row) in totals.iter_mut().zip(self.cells.iter()) {
            *total = row.iter().map(|c| u64::from(*c)).sum();
        }
        totals
    }

    /// Per-hour totals across the week
    pub fn column_totals(&self) -> [u64; HOURS_PER_DAY] {
        let mut totals = [0u64; HOURS_PER_DAY];
        for row in &self.cells {
            for (total, count) in totals.iter_mut().zip(row.iter()) {
                *total += u64::from(*count);
            }
        }
        totals
    }
}
