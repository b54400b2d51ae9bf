//! Clicked-cell highlighting
//!
//! The chart emphasises at most one cell. What it should be depends only on
//! the interaction that caused the redraw: a click selects that cell, while
//! a reset or any filter change clears the selection.

use chrono::Weekday;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::CoreError;
use crate::models::calendar::{parse_hour_label, parse_weekday_name, weekday_name, HOUR_LABELS};

/// One heatmap cell, identified the way the chart labels it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub weekday: Weekday,
    /// 0-23
    pub hour: u8,
}

impl CellRef {
    /// None if `hour` is not 0-23
    pub fn new(weekday: Weekday, hour: u8) -> Option<Self> {
        (usize::from(hour) < HOUR_LABELS.len()).then_some(Self { weekday, hour })
    }

    /// Parse the chart's own labels: hour `"00".."23"`, full weekday name
    pub fn from_labels(hour: &str, weekday: &str) -> Result<Self, CoreError> {
        match (parse_hour_label(hour), parse_weekday_name(weekday)) {
            (Some(hour), Some(weekday)) => Ok(Self { weekday, hour }),
            _ => Err(CoreError::InvalidCell {
                hour: hour.to_string(),
                weekday: weekday.to_string(),
            }),
        }
    }

    pub fn hour_label(&self) -> &'static str {
        HOUR_LABELS[usize::from(self.hour)]
    }

    pub fn weekday_label(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

impl Serialize for CellRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CellRef", 2)?;
        state.serialize_field("hour", self.hour_label())?;
        state.serialize_field("weekday", self.weekday_label())?;
        state.end()
    }
}

/// Cell to emphasise given the last click and whether reset was pressed
///
/// Reset wins over any click; otherwise the clicked cell passes through
/// unchanged.
pub fn resolve_highlight(click: Option<CellRef>, reset_requested: bool) -> Option<CellRef> {
    if reset_requested {
        return None;
    }
    click
}

/// The control whose change caused the current redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// First render, nothing touched yet
    Initial,
    DateChanged,
    ContractChanged,
    CellClicked(CellRef),
    ResetClicked,
}

impl Trigger {
    /// Build from the request's trigger name and clicked cell
    ///
    /// Accepted names: `date`, `contract`, `click`, `reset`; none means the
    /// initial render. A click without a cell is rejected.
    pub fn parse(name: Option<&str>, click: Option<CellRef>) -> Result<Self, CoreError> {
        match name.map(str::trim) {
            None | Some("") | Some("initial") => Ok(Trigger::Initial),
            Some("date") => Ok(Trigger::DateChanged),
            Some("contract") => Ok(Trigger::ContractChanged),
            Some("reset") => Ok(Trigger::ResetClicked),
            Some("click") => click
                .map(Trigger::CellClicked)
                .ok_or_else(|| CoreError::InvalidTrigger {
                    value: "click without a cell".to_string(),
                }),
            Some(other) => Err(CoreError::InvalidTrigger {
                value: other.to_string(),
            }),
        }
    }

    /// The highlight this trigger leads to
    ///
    /// Only a click carries its cell into the resolver, so a filter change
    /// never drags a stale selection onto a different chart.
    pub fn highlight(&self) -> Option<CellRef> {
        let click = match self {
            Trigger::CellClicked(cell) => Some(*cell),
            _ => None,
        };
        resolve_highlight(click, matches!(self, Trigger::ResetClicked))
    }
}

/// Selection state of the chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HighlightState {
    #[default]
    NoSelection,
    CellSelected(CellRef),
}

impl HighlightState {
    /// Transition on a trigger
    ///
    /// filter change -> NoSelection, click -> CellSelected, reset -> NoSelection
    pub fn apply(self, trigger: &Trigger) -> Self {
        match trigger.highlight() {
            Some(cell) => HighlightState::CellSelected(cell),
            None => HighlightState::NoSelection,
        }
    }

    pub fn selected(&self) -> Option<CellRef> {
        match self {
            HighlightState::NoSelection => None,
            HighlightState::CellSelected(cell) => Some(*cell),
        }
    }
}
