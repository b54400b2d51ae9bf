//! Session-hour heatmap aggregation
//!
//! Each session adds one to every (weekday, hour) cell it occupies, starting
//! at its start cell. Hours past 23 wrap to 00 of the next calendar day, so a
//! session crossing midnight continues on the following weekday row.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::CoreError;
use crate::models::calendar::{next_day, HOURS_PER_DAY};
use crate::models::{OccupancyMatrix, Session};

/// Range of session start times selected by the date picker
///
/// Starts at local midnight of the first date. The end is local midnight of
/// the last date, inclusive at one-second resolution: sessions later on the
/// last date are outside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Tz>,
    /// Exclusive upper bound
    end: DateTime<Tz>,
}

impl DateWindow {
    pub fn from_dates(start: NaiveDate, end: NaiveDate, tz: Tz) -> Self {
        Self {
            start: local_midnight(start, tz),
            end: local_midnight(end, tz) + Duration::seconds(1),
        }
    }

    /// Parse `YYYY-MM-DD` picker values
    pub fn parse(start: &str, end: &str, tz: Tz) -> Result<Self, CoreError> {
        Ok(Self::from_dates(parse_date(start)?, parse_date(end)?, tz))
    }

    pub fn contains(&self, ts: &DateTime<Tz>) -> bool {
        *ts >= self.start && *ts < self.end
    }

    /// True when no instant can fall inside (start date after end date)
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }
}

/// Parse a `YYYY-MM-DD` date
///
/// Pickers may send a full timestamp (`2024-10-01T00:00:00`); a time part
/// after `T` or a space is accepted if it is a valid time and then ignored.
pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    let invalid = || CoreError::InvalidDate {
        value: value.to_string(),
    };
    let trimmed = value.trim();
    let (date_part, time_part) = match trimmed.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time)),
        None => (trimmed, None),
    };
    if let Some(time) = time_part {
        NaiveTime::parse_from_str(time, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .map_err(|_| invalid())?;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| invalid())
}

/// First instant of `date` in `tz`
///
/// When midnight falls in a DST gap the day starts at the end of the gap:
/// the wall time is read with the offset in force before the transition.
fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive).earliest().unwrap_or_else(|| {
        let before = tz
            .offset_from_utc_datetime(&(naive - Duration::days(1)))
            .fix();
        tz.from_utc_datetime(&(naive - Duration::seconds(i64::from(before.local_minus_utc()))))
    })
}

/// One heatmap request: a contract and a start-time window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapQuery {
    pub contract: String,
    pub window: DateWindow,
}

impl HeatmapQuery {
    pub fn new(contract: impl Into<String>, window: DateWindow) -> Self {
        Self {
            contract: contract.into(),
            window,
        }
    }

    pub fn matches(&self, session: &Session) -> bool {
        session.is_contract(&self.contract) && self.window.contains(&session.start_time)
    }
}

/// Summary numbers shown next to the chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeatmapSummary {
    /// Sessions that passed the filter
    pub sessions: usize,
    /// Session-hours placed in the matrix
    pub session_hours: u64,
    /// Busiest cell value
    pub peak: u32,
}

/// Sessions selected by `query`
pub fn filter_sessions<'a, S: AsRef<Session>>(
    sessions: &'a [S],
    query: &'a HeatmapQuery,
) -> impl Iterator<Item = &'a Session> + 'a {
    sessions
        .iter()
        .map(<S as AsRef<Session>>::as_ref)
        .filter(move |session| query.matches(session))
}

/// Build the occupancy matrix for `query`
///
/// Pure: the same sessions and query always give the same matrix. An
/// unknown contract or an empty window gives an all-zero matrix.
pub fn aggregate<S: AsRef<Session>>(sessions: &[S], query: &HeatmapQuery) -> OccupancyMatrix {
    aggregate_with_summary(sessions, query).0
}

/// Like [`aggregate`], also counting the filtered sessions
pub fn aggregate_with_summary<S: AsRef<Session>>(
    sessions: &[S],
    query: &HeatmapQuery,
) -> (OccupancyMatrix, HeatmapSummary) {
    let mut matrix = OccupancyMatrix::zeros();
    let mut summary = HeatmapSummary::default();

    if query.window.is_empty() {
        return (matrix, summary);
    }

    for session in filter_sessions(sessions, query) {
        accumulate(&mut matrix, session);
        summary.sessions += 1;
    }

    summary.session_hours = matrix.total();
    summary.peak = matrix.max();
    (matrix, summary)
}

/// Add one session's hours to `matrix`
pub fn accumulate(matrix: &mut OccupancyMatrix, session: &Session) {
    let mut day = session.weekday;
    let mut hour = session.start_hour % HOURS_PER_DAY as u8;

    for _ in 0..session.duration_hours {
        matrix.increment(day, hour);
        hour += 1;
        if usize::from(hour) == HOURS_PER_DAY {
            hour = 0;
            day = next_day(day);
        }
    }
}
