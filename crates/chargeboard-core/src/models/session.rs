//! Charging session model
//!
//! A `Session` is one transaction joined with its charger and contract,
//! with timestamps already converted to the dashboard's time zone.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use super::calendar::weekday_name;

const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Joined, time-zone-normalized charging session
///
/// Immutable once built; the store hands out `Arc<Session>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// Physical charging point
    pub charger_id: String,
    /// Contract id from the charger registry (None when the charger is unknown)
    pub contract_id: Option<String>,
    /// Contract display name (None when the join did not resolve)
    pub contract_name: Option<String>,
    pub start_time: DateTime<Tz>,
    pub stop_time: DateTime<Tz>,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    /// 0-23, local time
    pub start_hour: u8,
    /// Rounded whole hours, see [`duration_hours`]
    pub duration_hours: u32,
}

impl Session {
    /// Build a session from UTC wall-clock timestamps
    pub fn from_utc(
        charger_id: String,
        contract_id: Option<String>,
        contract_name: Option<String>,
        start_utc: NaiveDateTime,
        stop_utc: NaiveDateTime,
        tz: Tz,
    ) -> Self {
        let start_time = tz.from_utc_datetime(&start_utc);
        let stop_time = tz.from_utc_datetime(&stop_utc);

        Self {
            charger_id,
            contract_id,
            contract_name,
            weekday: start_time.weekday(),
            start_hour: start_time.hour() as u8,
            duration_hours: duration_hours(&start_time, &stop_time),
            start_time,
            stop_time,
        }
    }

    /// True if this session belongs to the named contract
    pub fn is_contract(&self, name: &str) -> bool {
        self.contract_name.as_deref() == Some(name)
    }

    /// Display name of the start weekday
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

/// Session length in whole hours
///
/// Only the seconds-within-a-day part of `stop - start` counts (whole days
/// and the sub-second part are dropped, a negative difference wraps into the
/// previous day), then the hours are rounded half-to-even. Sessions under
/// thirty minutes therefore round to zero.
pub fn duration_hours<T: TimeZone>(start: &DateTime<T>, stop: &DateTime<T>) -> u32 {
    let delta = stop.clone().signed_duration_since(start.clone());
    let seconds = delta.num_seconds() - i64::from(delta.subsec_nanos() < 0);
    let seconds = seconds.rem_euclid(SECONDS_PER_DAY);

    let hours = seconds / SECONDS_PER_HOUR;
    let remainder = seconds % SECONDS_PER_HOUR;
    let rounded = match (2 * remainder).cmp(&SECONDS_PER_HOUR) {
        std::cmp::Ordering::Less => hours,
        std::cmp::Ordering::Greater => hours + 1,
        std::cmp::Ordering::Equal => hours + (hours % 2),
    };
    rounded as u32
}

impl AsRef<Session> for Session {
    fn as_ref(&self) -> &Session {
        self
    }
}

fn serialize_weekday<S: serde::Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(weekday_name(*day))
}
