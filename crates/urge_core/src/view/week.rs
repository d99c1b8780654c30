use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{enabled_tasks, resolve_view_day, ViewDay};
use crate::day::days_from;
use crate::model::{CheckInRecord, Task, UrgeLog};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    /// Sunday that opens the week.
    pub week_start: NaiveDate,
    /// Saturday that closes the week.
    pub week_end: NaiveDate,
    pub week_number: u32,
    pub year: i32,
    pub days: Vec<ViewDay>,
    pub tasks: Vec<Task>,
}

impl WeekView {
    pub fn range_label(&self) -> String {
        format_week_range(self.week_start, self.week_end)
    }
}

/// Sunday on or before `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_sunday()))
}

/// Saturday on or after `day`.
pub fn week_end(day: NaiveDate) -> NaiveDate {
    week_start(day) + Duration::days(6)
}

/// ISO-8601 week number: the week holding the Thursday of `day`'s Monday-based week.
pub fn iso_week_number(day: NaiveDate) -> u32 {
    day.iso_week().week()
}

pub fn previous_week_start(current: NaiveDate) -> NaiveDate {
    week_start(current) - Duration::days(7)
}

pub fn next_week_start(current: NaiveDate) -> NaiveDate {
    week_start(current) + Duration::days(7)
}

/// `Mar 3 - 9`, or `Mar 30 - Apr 5` when the week spans two months.
pub fn format_week_range(start: NaiveDate, end: NaiveDate) -> String {
    let start_month = MONTH_ABBREVIATIONS[start.month0() as usize];
    if start.month() == end.month() {
        format!("{} {} - {}", start_month, start.day(), end.day())
    } else {
        let end_month = MONTH_ABBREVIATIONS[end.month0() as usize];
        format!("{} {} - {} {}", start_month, start.day(), end_month, end.day())
    }
}

/// Sunday-to-Saturday week containing `anchor`, resolved against `today`.
pub fn week_view(
    tasks: &[Task],
    urge_logs: &[UrgeLog],
    check_ins: &[CheckInRecord],
    anchor: NaiveDate,
    today: NaiveDate,
) -> WeekView {
    let tasks = enabled_tasks(tasks);
    let start = week_start(anchor);
    let days = days_from(start, 7)
        .into_iter()
        .map(|day| resolve_view_day(day, &tasks, urge_logs, check_ins, today))
        .collect();

    WeekView {
        week_start: start,
        week_end: week_end(anchor),
        week_number: iso_week_number(anchor),
        year: anchor.year(),
        days,
        tasks,
    }
}
