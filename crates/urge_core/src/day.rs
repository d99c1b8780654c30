use std::fmt;

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonical `YYYY-MM-DD` identifier of a local calendar day.
///
/// Keys are zero padded, so ordinary string ordering matches chronological
/// ordering. Check-in records persist this string directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    pub fn of(day: NaiveDate) -> Self {
        Self(day.format(DAY_KEY_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a `YYYY-MM-DD` day key back into a calendar day.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DAY_KEY_FORMAT).ok()
}

/// Key of the local day an instant falls on.
pub fn day_key(instant: DateTime<Utc>) -> DayKey {
    DayKey::of(local_day(instant))
}

pub fn local_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Instant of local 00:00:00.000 on `day`.
pub fn day_start(day: NaiveDate) -> DateTime<Utc> {
    resolve_local(day.and_time(NaiveTime::MIN), Edge::Earliest)
}

/// Instant of local 23:59:59.999 on `day`.
pub fn day_end(day: NaiveDate) -> DateTime<Utc> {
    let last_milli = day.and_time(NaiveTime::MIN) + Duration::milliseconds(86_399_999);
    resolve_local(last_milli, Edge::Latest)
}

/// Inclusive `[start, end]` instant bounds of a local day.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    (day_start(day), day_end(day))
}

/// Instant of a local wall-clock time on `day`.
pub fn local_instant(day: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    resolve_local(day.and_time(time), Edge::Earliest)
}

/// Consecutive days starting at `first`, oldest first.
pub fn days_from(first: NaiveDate, count: usize) -> Vec<NaiveDate> {
    first.iter_days().take(count).collect()
}

#[derive(Clone, Copy)]
enum Edge {
    Earliest,
    Latest,
}

/// Maps a wall-clock time in the host's local zone to an instant.
///
/// Only the host zone decides which branch runs: repeated wall-clock times
/// (DST fall-back) pick the edge asked for, and skipped ones (spring-forward)
/// move to the first instant after the gap.
fn resolve_local(naive: NaiveDateTime, edge: Edge) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(local) => local.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, latest) => match edge {
            Edge::Earliest => earliest.with_timezone(&Utc),
            Edge::Latest => latest.with_timezone(&Utc),
        },
        LocalResult::None => Local
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    }
}
