//! chargeboard-core - Core library for chargeboard
//!
//! Provides CSV parsers, the session join, the immutable store, heatmap
//! aggregation and the chart description for EV charger usage data.

pub mod analytics;
pub mod chart;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod parsers;
pub mod store;

pub use analytics::{CellRef, DateWindow, HeatmapQuery, HeatmapSummary, HighlightState, Trigger};
pub use chart::HeatmapFigure;
pub use config::DashboardConfig;
pub use error::{CoreError, ErrorSeverity, LoadError, LoadReport};
pub use loader::{load_sessions, DatasetLoader};
pub use models::{OccupancyMatrix, Session};
pub use store::{ContractOverview, DataStore};
