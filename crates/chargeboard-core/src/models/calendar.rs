//! Weekday and hour axes of the heatmap
//!
//! Two orderings coexist: the chronological week used to roll sessions over
//! midnight, and the display order of the chart rows (top to bottom), which
//! runs backwards from Sunday to Monday.

use chrono::Weekday;

/// Chronological week, Monday first
pub const CHRONOLOGICAL: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Row order of the occupancy matrix and of the chart's vertical axis
pub const DISPLAY_ORDER: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Sat,
    Weekday::Fri,
    Weekday::Thu,
    Weekday::Wed,
    Weekday::Tue,
    Weekday::Mon,
];

/// Column labels of the chart's horizontal axis
pub const HOUR_LABELS: [&str; 24] = [
    "00", "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12", "13", "14",
    "15", "16", "17", "18", "19", "20", "21", "22", "23",
];

pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_WEEK: usize = 7;

/// Full English name, as `strftime("%A")` prints it
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a full English weekday name (exact match)
pub fn parse_weekday_name(name: &str) -> Option<Weekday> {
    CHRONOLOGICAL
        .iter()
        .copied()
        .find(|day| weekday_name(*day) == name)
}

/// The calendar day after `day` (Sunday wraps to Monday)
pub fn next_day(day: Weekday) -> Weekday {
    let index = day.num_days_from_monday() as usize;
    CHRONOLOGICAL[(index + 1) % DAYS_PER_WEEK]
}

/// Row of `day` in [`DISPLAY_ORDER`]
pub fn display_row(day: Weekday) -> usize {
    // Sunday is row 0, Monday row 6
    DAYS_PER_WEEK - 1 - day.num_days_from_monday() as usize
}

/// Weekday names in display order
pub fn display_labels() -> Vec<&'static str> {
    DISPLAY_ORDER.iter().map(|d| weekday_name(*d)).collect()
}

/// Hour of a `"00".."23"` label; anything else is rejected
pub fn parse_hour_label(label: &str) -> Option<u8> {
    HOUR_LABELS
        .iter()
        .position(|l| *l == label)
        .map(|hour| hour as u8)
}
