use std::iter;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{CheckInRecord, Task, TaskKind, UrgeLog};
use crate::status::{resolve_day_status, DayStatus};

/// Upper bound on the number of days a streak walk visits (ten years).
pub const MAX_STREAK_WALK_DAYS: usize = 3650;

/// Counts consecutive successful days walking backward from `reference`.
///
/// Pending days are passed through without counting. The walk stops at the
/// first failure or at the edge of the task's window, and never visits more
/// than [`MAX_STREAK_WALK_DAYS`] days.
pub fn task_streak(
    task: &Task,
    reference: NaiveDate,
    urge_logs: &[UrgeLog],
    check_ins: &[CheckInRecord],
) -> u32 {
    let mut visited = 0;
    let streak = iter::successors(Some(reference), |day| day.pred_opt())
        .take(MAX_STREAK_WALK_DAYS)
        .map(|day| resolve_day_status(task, day, urge_logs, check_ins, reference))
        .take_while(|status| matches!(status, DayStatus::Success | DayStatus::Pending))
        .inspect(|_| visited += 1)
        .filter(|status| *status == DayStatus::Success)
        .count();
    if visited == MAX_STREAK_WALK_DAYS {
        tracing::debug!(task = %task.id, streak, "streak walk reached its day cap");
    }
    u32::try_from(streak).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub task_id: String,
    pub task_name: String,
    pub task_kind: TaskKind,
    pub streak_days: u32,
    pub is_enabled: bool,
}

/// Streaks of every enabled task, longest first; ties keep input order.
pub fn task_progresses(
    tasks: &[Task],
    urge_logs: &[UrgeLog],
    check_ins: &[CheckInRecord],
    reference: NaiveDate,
) -> Vec<TaskProgress> {
    let mut progresses: Vec<TaskProgress> = tasks
        .iter()
        .filter(|task| task.is_enabled)
        .map(|task| TaskProgress {
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            task_kind: task.kind,
            streak_days: task_streak(task, reference, urge_logs, check_ins),
            is_enabled: task.is_enabled,
        })
        .collect();
    progresses.sort_by(|a, b| b.streak_days.cmp(&a.streak_days));
    progresses
}
