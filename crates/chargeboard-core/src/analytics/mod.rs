//! Heatmap analytics for charger usage
//!
//! `heatmap` turns filtered sessions into the 7×24 occupancy matrix,
//! `highlight` decides which cell, if any, the chart emphasises.

pub mod heatmap;
pub mod highlight;


pub use heatmap::{
    accumulate, aggregate, aggregate_with_summary, filter_sessions, parse_date, DateWindow,
    HeatmapQuery, HeatmapSummary,
};
pub use highlight::{resolve_highlight, CellRef, HighlightState, Trigger};
