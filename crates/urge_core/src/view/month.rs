use chrono::{Datelike, Duration, Month, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{enabled_tasks, resolve_view_day, DaySummary, ViewDay};
use crate::day::days_from;
use crate::model::{CheckInRecord, Task, UrgeLog};
use crate::view::week::week_start;

/// Days in a month grid: six full Sunday-first weeks.
pub const MONTH_GRID_DAYS: usize = 42;

/// Display classification of a month grid cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayTone {
    OutsideMonth,
    AllSucceeded,
    NeedsAttention,
    Quiet,
}

impl DayTone {
    pub fn classify(summary: &DaySummary, is_current_month: bool) -> Self {
        if !is_current_month {
            DayTone::OutsideMonth
        } else if summary.active_task_count > 0
            && summary.success_count == summary.active_task_count
        {
            DayTone::AllSucceeded
        } else if summary.failure_count > 0 || summary.pending_count > 0 {
            DayTone::NeedsAttention
        } else {
            DayTone::Quiet
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthDay {
    #[serde(flatten)]
    pub day: ViewDay,
    pub is_current_month: bool,
    pub tone: DayTone,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub days: Vec<MonthDay>,
    pub tasks: Vec<Task>,
}

pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

pub fn month_end(day: NaiveDate) -> NaiveDate {
    next_month_start(day).pred_opt().unwrap_or(day)
}

pub fn previous_month_start(day: NaiveDate) -> NaiveDate {
    month_start(month_start(day).pred_opt().unwrap_or(day))
}

pub fn next_month_start(day: NaiveDate) -> NaiveDate {
    // No month is longer than 31 days, and none is shorter than 28.
    month_start(month_start(day) + Duration::days(31))
}

pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

/// The 42 days from the Sunday on or before the first of `day`'s month.
pub fn month_grid(day: NaiveDate) -> Vec<NaiveDate> {
    days_from(week_start(month_start(day)), MONTH_GRID_DAYS)
}

/// Six-week grid covering the month of `anchor`, resolved against `today`.
pub fn month_view(
    tasks: &[Task],
    urge_logs: &[UrgeLog],
    check_ins: &[CheckInRecord],
    anchor: NaiveDate,
    today: NaiveDate,
) -> MonthView {
    let tasks = enabled_tasks(tasks);
    let days = month_grid(anchor)
        .into_iter()
        .map(|day| {
            let is_current_month = day.year() == anchor.year() && day.month() == anchor.month();
            let day = resolve_view_day(day, &tasks, urge_logs, check_ins, today);
            MonthDay {
                tone: DayTone::classify(&day.summary, is_current_month),
                day,
                is_current_month,
            }
        })
        .collect();

    MonthView {
        month_start: month_start(anchor),
        month_end: month_end(anchor),
        year: anchor.year(),
        month: anchor.month(),
        month_name: month_name(anchor.month()).to_string(),
        days,
        tasks,
    }
}
