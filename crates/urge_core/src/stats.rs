use std::collections::HashSet;

use chrono::serde::ts_milliseconds_option;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::day::{day_bounds, local_day, DayKey};
use crate::model::{CheckInRecord, Outcome, Task, TaskKind, UrgeLog};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Urge outcomes attributed to one task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub task_id: String,
    pub task_name: String,
    pub association_count: u32,
    pub resisted_count: u32,
    pub relapsed_count: u32,
    /// Rounded percentage of resisted outcomes; 0 without outcomes.
    pub success_rate: u32,
    #[serde(default, with = "ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub last_associated_at: Option<DateTime<Utc>>,
}

pub fn task_stats(tasks: &[Task], urge_logs: &[UrgeLog]) -> Vec<TaskStats> {
    tasks
        .iter()
        .map(|task| {
            let mut stats = TaskStats {
                task_id: task.id.clone(),
                task_name: task.name.clone(),
                association_count: 0,
                resisted_count: 0,
                relapsed_count: 0,
                success_rate: 0,
                last_associated_at: None,
            };
            for log in urge_logs.iter().filter(|log| log.belongs_to(&task.id)) {
                stats.association_count += 1;
                match log.outcome {
                    Some(Outcome::Resisted) => stats.resisted_count += 1,
                    Some(Outcome::Relapsed) => stats.relapsed_count += 1,
                    None => {}
                }
                if stats.last_associated_at.map_or(true, |last| log.timestamp > last) {
                    stats.last_associated_at = Some(log.timestamp);
                }
            }
            stats.success_rate = percentage(
                stats.resisted_count,
                stats.resisted_count + stats.relapsed_count,
            );
            stats
        })
        .collect()
}

/// Number of tasks offered for association when an intervention ends.
pub const RECENT_TASK_LIMIT: usize = 5;

/// Tasks most recently associated with an urge, newest first, padded with
/// the most recently added tasks up to `limit`.
pub fn recent_tasks(tasks: &[Task], urge_logs: &[UrgeLog], limit: usize) -> Vec<Task> {
    let mut associations: Vec<&UrgeLog> = urge_logs
        .iter()
        .filter(|log| log.task_id.as_deref().is_some_and(|id| !id.is_empty()))
        .collect();
    associations.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut seen = HashSet::new();
    let mut recent: Vec<Task> = associations
        .iter()
        .filter_map(|log| log.task_id.as_deref())
        .filter(|id| seen.insert(*id))
        .filter_map(|id| tasks.iter().find(|task| task.id == id))
        .take(limit)
        .cloned()
        .collect();

    let missing = limit.saturating_sub(recent.len());
    recent.extend(
        tasks
            .iter()
            .rev()
            .filter(|task| !seen.contains(task.id.as_str()))
            .take(missing)
            .cloned(),
    );
    recent
}

/// Where a task stands over its whole window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskLifecycle {
    Active,
    Completed,
    Failed,
}

/// Active until the window closes; afterwards completed when the completed
/// check-ins reach the target (or the window length in days without one).
pub fn task_lifecycle(
    task: &Task,
    check_ins: &[CheckInRecord],
    now: DateTime<Utc>,
) -> TaskLifecycle {
    if !is_task_expired(task, now) {
        return TaskLifecycle::Active;
    }
    let completed = check_ins
        .iter()
        .filter(|record| record.task_id == task.id && record.is_completed)
        .count() as u64;
    let target = task
        .target_completion
        .map(u64::from)
        .unwrap_or_else(|| window_days(task));
    if completed >= target {
        TaskLifecycle::Completed
    } else {
        TaskLifecycle::Failed
    }
}

fn window_days(task: &Task) -> u64 {
    let span = (task.end_date - task.start_date).num_milliseconds().max(0);
    // Ceiling division on a non-negative span.
    ((span + DAY_MILLIS - 1) / DAY_MILLIS) as u64
}

pub fn is_task_active(task: &Task, now: DateTime<Utc>) -> bool {
    task.covers(now)
}

pub fn is_task_expired(task: &Task, now: DateTime<Utc>) -> bool {
    now > task.end_date
}

/// Whether a completed check-in was stored under `day`'s key.
pub fn has_checked_in_on(task_id: &str, check_ins: &[CheckInRecord], day: NaiveDate) -> bool {
    let key = DayKey::of(day);
    check_ins.iter().any(|record| {
        record.task_id == task_id && record.is_completed && record.date_key == key.as_str()
    })
}

/// Rounded share of today's enabled, active pursue tasks already checked in; 100 when none apply.
pub fn pursue_completion_rate(
    tasks: &[Task],
    check_ins: &[CheckInRecord],
    now: DateTime<Utc>,
) -> u32 {
    let today = local_day(now);
    let due: Vec<&Task> = tasks
        .iter()
        .filter(|task| {
            task.kind == TaskKind::Pursue && task.is_enabled && is_task_active(task, now)
        })
        .collect();
    if due.is_empty() {
        return 100;
    }
    let done = due
        .iter()
        .filter(|task| has_checked_in_on(&task.id, check_ins, today))
        .count();
    percentage(done as u32, due.len() as u32)
}

/// Urge logs recorded on `day`, completed or not.
pub fn urge_count_on(urge_logs: &[UrgeLog], day: NaiveDate) -> usize {
    let (start, end) = day_bounds(day);
    urge_logs
        .iter()
        .filter(|log| log.timestamp >= start && log.timestamp <= end)
        .count()
}

pub fn completed_urge_count_on(urge_logs: &[UrgeLog], day: NaiveDate) -> usize {
    let (start, end) = day_bounds(day);
    urge_logs
        .iter()
        .filter(|log| log.is_completed && log.timestamp >= start && log.timestamp <= end)
        .count()
}

fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((f64::from(part) / f64::from(whole)) * 100.0).round() as u32
}
