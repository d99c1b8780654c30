use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::day::day_bounds;
use crate::model::{CheckInRecord, Outcome, Task, TaskKind, UrgeLog};
use crate::time_state::{classify, TimeState};

/// Resolved state of one task on one calendar day.
///
/// `OutOfRange` means the task does not apply on that day. It is never an
/// outcome and is left out of every tally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    Success,
    Failure,
    Pending,
    OutOfRange,
}

impl DayStatus {
    pub fn is_in_range(self) -> bool {
        self != DayStatus::OutOfRange
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayStatus::Success => "success",
            DayStatus::Failure => "failure",
            DayStatus::Pending => "pending",
            DayStatus::OutOfRange => "out of range",
        }
    }
}

/// Whether `day` lies inside the task's validity window.
///
/// The local midnight of `day` is compared against the raw window instants,
/// so a window opening mid-day only covers the following days.
pub fn in_window(task: &Task, day: NaiveDate) -> bool {
    let (start, _) = day_bounds(day);
    task.covers(start)
}

/// Derives the status of `task` on `day` from the raw event records.
///
/// Steps short-circuit in order: window check, record lookup for the task
/// kind, then the time state of `day` relative to `reference`.
pub fn resolve_day_status(
    task: &Task,
    day: NaiveDate,
    urge_logs: &[UrgeLog],
    check_ins: &[CheckInRecord],
    reference: NaiveDate,
) -> DayStatus {
    if !in_window(task, day) {
        return DayStatus::OutOfRange;
    }

    let bounds = day_bounds(day);
    let recorded = match task.kind {
        TaskKind::Pursue => check_in_status(task, bounds, check_ins),
        TaskKind::Avoid => urge_status(task, bounds, urge_logs),
    };
    if let Some(status) = recorded {
        return status;
    }

    match classify(day, reference) {
        TimeState::Past => DayStatus::Failure,
        TimeState::Today | TimeState::Future => DayStatus::Pending,
    }
}

fn within((start, end): (DateTime<Utc>, DateTime<Utc>), instant: DateTime<Utc>) -> bool {
    instant >= start && instant <= end
}

fn check_in_status(
    task: &Task,
    bounds: (DateTime<Utc>, DateTime<Utc>),
    check_ins: &[CheckInRecord],
) -> Option<DayStatus> {
    let mut on_day = check_ins
        .iter()
        .filter(|record| record.task_id == task.id && within(bounds, record.timestamp));
    // A completed record wins over any uncompleted one on the same day.
    if on_day.clone().any(|record| record.is_completed) {
        Some(DayStatus::Success)
    } else if on_day.any(|record| !record.is_completed) {
        Some(DayStatus::Failure)
    } else {
        None
    }
}

fn urge_status(
    task: &Task,
    bounds: (DateTime<Utc>, DateTime<Utc>),
    urge_logs: &[UrgeLog],
) -> Option<DayStatus> {
    let mut on_day = urge_logs
        .iter()
        .filter(|log| log.belongs_to(&task.id) && log.is_completed && within(bounds, log.timestamp))
        .peekable();
    on_day.peek()?;
    if on_day.any(|log| log.outcome == Some(Outcome::Relapsed)) {
        Some(DayStatus::Failure)
    } else {
        Some(DayStatus::Success)
    }
}
