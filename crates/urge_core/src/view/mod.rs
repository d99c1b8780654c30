//! Calendar views folding per-task day statuses into per-day summaries.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::day::DayKey;
use crate::model::{CheckInRecord, Task, UrgeLog};
use crate::status::{resolve_day_status, DayStatus};
use crate::time_state::is_past;

pub mod month;
pub mod range;
pub mod week;

pub use month::{month_view, MonthDay, MonthView};
pub use range::{range_view, RangeView};
pub use week::{week_view, WeekView};

/// Status of one in-range task on a view day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDayState {
    pub task_id: String,
    pub task_name: String,
    pub status: DayStatus,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub success_count: u32,
    pub failure_count: u32,
    pub pending_count: u32,
    /// Tasks whose window covers the day.
    pub active_task_count: u32,
}

impl DaySummary {
    /// Short text such as `2 done, 1 pending`.
    pub fn describe(&self) -> String {
        if self.active_task_count == 0 {
            return "no tasks".to_string();
        }
        let parts: Vec<String> = [
            (self.success_count, "done"),
            (self.failure_count, "missed"),
            (self.pending_count, "pending"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{count} {label}"))
        .collect();
        if parts.is_empty() {
            "no records".to_string()
        } else {
            parts.join(", ")
        }
    }

    fn tally(states: &[TaskDayState]) -> Self {
        let mut summary = DaySummary {
            active_task_count: states.len() as u32,
            ..DaySummary::default()
        };
        for state in states {
            match state.status {
                DayStatus::Success => summary.success_count += 1,
                DayStatus::Failure => summary.failure_count += 1,
                DayStatus::Pending => summary.pending_count += 1,
                DayStatus::OutOfRange => {}
            }
        }
        summary
    }
}

/// One day of a range, week, or month view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewDay {
    pub date_key: DayKey,
    pub date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u32,
    pub day_number: u32,
    pub month: u32,
    pub is_today: bool,
    /// Strictly before the reference day; the reference day itself is not past.
    pub is_past: bool,
    pub is_weekend: bool,
    /// In-range tasks only, in task input order.
    pub task_states: Vec<TaskDayState>,
    pub summary: DaySummary,
}

impl ViewDay {
    pub fn status_of(&self, task_id: &str) -> Option<DayStatus> {
        self.task_states
            .iter()
            .find(|state| state.task_id == task_id)
            .map(|state| state.status)
    }

    pub fn weekday_label(&self) -> &'static str {
        match self.date.weekday() {
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }
}

/// Resolves every task on `day` and summarises the in-range ones.
pub(crate) fn resolve_view_day(
    day: NaiveDate,
    tasks: &[Task],
    urge_logs: &[UrgeLog],
    check_ins: &[CheckInRecord],
    reference: NaiveDate,
) -> ViewDay {
    let task_states: Vec<TaskDayState> = tasks
        .iter()
        .map(|task| (task, resolve_day_status(task, day, urge_logs, check_ins, reference)))
        .filter(|(_, status)| status.is_in_range())
        .map(|(task, status)| TaskDayState {
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            status,
        })
        .collect();
    let summary = DaySummary::tally(&task_states);
    let weekday = day.weekday();

    ViewDay {
        date_key: DayKey::of(day),
        date: day,
        day_of_week: weekday.num_days_from_sunday(),
        day_number: day.day(),
        month: day.month(),
        is_today: day == reference,
        is_past: is_past(day, reference),
        is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
        task_states,
        summary,
    }
}

pub(crate) fn enabled_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().filter(|task| task.is_enabled).cloned().collect()
}
