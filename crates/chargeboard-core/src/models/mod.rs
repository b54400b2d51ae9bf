//! Data models for chargeboard

pub mod calendar;
pub mod matrix;
pub mod session;

pub use calendar::{
    display_labels, display_row, next_day, weekday_name, DISPLAY_ORDER, HOUR_LABELS,
};
pub use matrix::OccupancyMatrix;
pub use session::{duration_hours, Session};
