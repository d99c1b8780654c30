use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::day::{day_key, DayKey};

/// Position of a day relative to a reference day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeState {
    Past,
    Today,
    Future,
}

/// Classifies `day` against `reference` by comparing day keys, never raw instants.
pub fn classify(day: NaiveDate, reference: NaiveDate) -> TimeState {
    classify_keys(&DayKey::of(day), &DayKey::of(reference))
}

pub fn classify_instant(instant: DateTime<Utc>, reference: DateTime<Utc>) -> TimeState {
    classify_keys(&day_key(instant), &day_key(reference))
}

fn classify_keys(day: &DayKey, reference: &DayKey) -> TimeState {
    if day < reference {
        TimeState::Past
    } else if day == reference {
        TimeState::Today
    } else {
        TimeState::Future
    }
}

pub fn is_past(day: NaiveDate, reference: NaiveDate) -> bool {
    classify(day, reference) == TimeState::Past
}

pub fn is_today(day: NaiveDate, reference: NaiveDate) -> bool {
    classify(day, reference) == TimeState::Today
}

pub fn is_future(day: NaiveDate, reference: NaiveDate) -> bool {
    classify(day, reference) == TimeState::Future
}
