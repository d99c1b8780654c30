//! Builders shared by the unit tests.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::day::{day_end, day_start, local_instant, DayKey};
use crate::model::{CheckInRecord, InterventionKind, Outcome, Task, TaskKind, UrgeLog};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(day: NaiveDate, hour: u32) -> DateTime<Utc> {
    local_instant(day, NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
}

/// Task whose window runs from local midnight of `first` to the end of `last`.
pub fn task(id: &str, kind: TaskKind, first: NaiveDate, last: NaiveDate) -> Task {
    Task::new(id, format!("task {id}"), kind, day_start(first), day_end(last))
}

pub fn check_in(task_id: &str, when: DateTime<Utc>, completed: bool) -> CheckInRecord {
    CheckInRecord {
        id: format!("{task_id}-{}", when.timestamp_millis()),
        task_id: task_id.to_string(),
        timestamp: when,
        is_completed: completed,
        date_key: crate::day::day_key(when).to_string(),
    }
}

pub fn urge(task_id: &str, when: DateTime<Utc>, outcome: Option<Outcome>) -> UrgeLog {
    UrgeLog {
        id: format!("urge-{task_id}-{}", when.timestamp_millis()),
        timestamp: when,
        assigned_intervention: InterventionKind::Timer,
        is_completed: true,
        outcome,
        trigger_reason: None,
        cognitive_tag: None,
        task_id: Some(task_id.to_string()),
    }
}

pub fn key(day: NaiveDate) -> String {
    DayKey::of(day).to_string()
}
