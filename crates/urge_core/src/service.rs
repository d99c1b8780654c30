use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::day::{day_key, local_day};
use crate::error::TrackerError;
use crate::model::{
    CheckInRecord, InterventionKind, Outcome, PeriodKind, Task, TaskKind, UrgeLog,
};
use crate::snapshot::TrackerSnapshot;
use crate::stats::{self, TaskLifecycle, TaskStats};
use crate::status::{resolve_day_status, DayStatus};
use crate::streak::{task_progresses, task_streak, TaskProgress};
use crate::view::{self, MonthView, RangeView, WeekView};

/// Window length given to tasks created without an explicit end.
pub const DEFAULT_TASK_DAYS: i64 = 30;

/// Input for [`TrackerService::add_task`]; unset fields take the defaults.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub kind: TaskKind,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub period_type: Option<PeriodKind>,
    pub custom_days: Option<u32>,
    pub target_completion: Option<u32>,
}

impl NewTask {
    pub fn new(name: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            name: name.into(),
            kind,
            start_date: None,
            end_date: None,
            period_type: None,
            custom_days: None,
            target_completion: None,
        }
    }

    pub fn window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn target(mut self, completions: u32) -> Self {
        self.target_completion = Some(completions);
        self
    }
}

/// The urge log currently going through an intervention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveIntervention {
    pub log_id: String,
    pub kind: InterventionKind,
    pub started_at: DateTime<Utc>,
}

pub struct TrackerService {
    dataset: RwLock<TrackerSnapshot>,
    intervention: RwLock<Option<ActiveIntervention>>,
    snapshot_path: Option<PathBuf>,
    clock: Box<dyn Clock>,
}

pub struct TrackerServiceBuilder {
    snapshot_path: Option<PathBuf>,
    snapshot: Option<TrackerSnapshot>,
    clock: Option<Box<dyn Clock>>,
}

impl TrackerServiceBuilder {
    pub fn new() -> Self {
        Self {
            snapshot_path: None,
            snapshot: None,
            clock: None,
        }
    }

    pub fn with_snapshot_path(mut self, path: impl AsRef<Path>) -> Self {
        self.snapshot_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Seeds the dataset; takes precedence over the snapshot file.
    pub fn with_snapshot(mut self, snapshot: TrackerSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<TrackerService> {
        let dataset = match (self.snapshot, &self.snapshot_path) {
            (Some(snapshot), _) => snapshot,
            (None, Some(path)) => TrackerSnapshot::load_or_default(path)?,
            (None, None) => TrackerSnapshot::default(),
        };
        Ok(TrackerService {
            dataset: RwLock::new(dataset),
            intervention: RwLock::new(None),
            snapshot_path: self.snapshot_path,
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
        })
    }
}

impl Default for TrackerServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerService {
    pub fn builder() -> TrackerServiceBuilder {
        TrackerServiceBuilder::new()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.dataset.read().tasks.clone()
    }

    pub fn task(&self, task_id: &str) -> Result<Task, TrackerError> {
        self.dataset
            .read()
            .tasks
            .iter()
            .find(|task| task.id == task_id)
            .cloned()
            .ok_or_else(|| TrackerError::TaskNotFound(task_id.to_string()))
    }

    pub fn urge_logs(&self) -> Vec<UrgeLog> {
        self.dataset.read().urge_logs.clone()
    }

    pub fn check_in_records(&self) -> Vec<CheckInRecord> {
        self.dataset.read().check_in_records.clone()
    }

    #[instrument(skip(self))]
    pub fn add_task(&self, new_task: NewTask) -> Result<Task, TrackerError> {
        let now = self.now();
        let start = new_task.start_date.unwrap_or(now);
        let end = new_task
            .end_date
            .unwrap_or_else(|| start + Duration::days(DEFAULT_TASK_DAYS));
        if start > end {
            return Err(TrackerError::InvalidWindow);
        }
        let task = Task {
            id: Uuid::new_v4().to_string(),
            name: new_task.name,
            kind: new_task.kind,
            is_enabled: true,
            start_date: start,
            end_date: end,
            period_type: new_task.period_type.unwrap_or_default(),
            custom_days: new_task.custom_days,
            target_completion: new_task.target_completion,
        };
        self.dataset.write().tasks.push(task.clone());
        tracing::info!(task_id = %task.id, "task added");
        Ok(task)
    }

    /// Flips the enabled flag and returns the new value.
    #[instrument(skip(self))]
    pub fn toggle_task(&self, task_id: &str) -> Result<bool, TrackerError> {
        let mut dataset = self.dataset.write();
        let task = dataset
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| TrackerError::TaskNotFound(task_id.to_string()))?;
        task.is_enabled = !task.is_enabled;
        Ok(task.is_enabled)
    }

    /// Removes the task; its urge logs and check-ins stay in the dataset.
    #[instrument(skip(self))]
    pub fn delete_task(&self, task_id: &str) -> Result<Task, TrackerError> {
        let mut dataset = self.dataset.write();
        let index = dataset
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or_else(|| TrackerError::TaskNotFound(task_id.to_string()))?;
        Ok(dataset.tasks.remove(index))
    }

    #[instrument(skip(self))]
    pub fn check_in(&self, task_id: &str) -> Result<CheckInRecord, TrackerError> {
        let now = self.now();
        let today = local_day(now);
        let mut dataset = self.dataset.write();
        let task = dataset
            .tasks
            .iter()
            .find(|task| task.id == task_id)
            .ok_or_else(|| TrackerError::TaskNotFound(task_id.to_string()))?;
        if !stats::is_task_active(task, now) {
            return Err(TrackerError::TaskNotActive(task_id.to_string()));
        }
        if stats::has_checked_in_on(task_id, &dataset.check_in_records, today) {
            return Err(TrackerError::AlreadyCheckedIn {
                task_id: task_id.to_string(),
                day: day_key(now),
            });
        }
        let record = CheckInRecord {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.to_string(),
            timestamp: now,
            is_completed: true,
            date_key: day_key(now).to_string(),
        };
        dataset.check_in_records.push(record.clone());
        tracing::info!(date_key = %record.date_key, "checked in");
        Ok(record)
    }

    /// Opens an intervention on a fresh urge log, or on `existing_log_id`
    /// after clearing its previous result.
    #[instrument(skip(self))]
    pub fn start_intervention(
        &self,
        kind: InterventionKind,
        existing_log_id: Option<&str>,
    ) -> UrgeLog {
        let now = self.now();
        let mut intervention = self.intervention.write();
        let mut dataset = self.dataset.write();
        let reused = existing_log_id
            .and_then(|id| dataset.urge_logs.iter_mut().find(|log| log.id == id));
        let log = match reused {
            Some(log) => {
                log.assigned_intervention = kind;
                log.is_completed = false;
                log.outcome = None;
                log.clone()
            }
            None => {
                let log = UrgeLog {
                    id: Uuid::new_v4().to_string(),
                    timestamp: now,
                    assigned_intervention: kind,
                    is_completed: false,
                    outcome: None,
                    trigger_reason: None,
                    cognitive_tag: None,
                    task_id: None,
                };
                dataset.urge_logs.push(log.clone());
                log
            }
        };
        *intervention = Some(ActiveIntervention {
            log_id: log.id.clone(),
            kind,
            started_at: now,
        });
        tracing::debug!(log_id = %log.id, "intervention started");
        log
    }

    pub fn active_intervention(&self) -> Option<ActiveIntervention> {
        self.intervention.read().clone()
    }

    pub fn mark_intervention_completed(&self) -> Result<UrgeLog, TrackerError> {
        self.update_active_log(|log| log.is_completed = true)
    }

    pub fn set_trigger_reason(&self, reason: impl Into<String>) -> Result<UrgeLog, TrackerError> {
        let reason = reason.into();
        self.update_active_log(|log| log.trigger_reason = Some(reason))
    }

    pub fn set_cognitive_tag(&self, tag: impl Into<String>) -> Result<UrgeLog, TrackerError> {
        let tag = tag.into();
        self.update_active_log(|log| log.cognitive_tag = Some(tag))
    }

    /// Records the outcome on the active log and closes the intervention.
    ///
    /// The completion flag is left alone; only
    /// [`TrackerService::mark_intervention_completed`] sets it.
    #[instrument(skip(self))]
    pub fn complete_intervention(
        &self,
        outcome: Outcome,
        task_id: Option<&str>,
    ) -> Result<UrgeLog, TrackerError> {
        let mut intervention = self.intervention.write();
        let active = intervention
            .as_ref()
            .ok_or(TrackerError::NoActiveIntervention)?;
        let mut dataset = self.dataset.write();
        if let Some(task_id) = task_id {
            if !dataset.tasks.iter().any(|task| task.id == task_id) {
                return Err(TrackerError::TaskNotFound(task_id.to_string()));
            }
        }
        let log = dataset
            .urge_logs
            .iter_mut()
            .find(|log| log.id == active.log_id)
            .ok_or(TrackerError::NoActiveIntervention)?;
        log.outcome = Some(outcome);
        log.task_id = task_id.map(str::to_string);
        let log = log.clone();
        *intervention = None;
        tracing::info!(log_id = %log.id, ?outcome, "intervention completed");
        Ok(log)
    }

    /// Ends the intervention, leaving its urge log as it is.
    pub fn cancel_intervention(&self) -> Option<ActiveIntervention> {
        self.intervention.write().take()
    }

    fn update_active_log(
        &self,
        update: impl FnOnce(&mut UrgeLog),
    ) -> Result<UrgeLog, TrackerError> {
        let intervention = self.intervention.read();
        let active = intervention
            .as_ref()
            .ok_or(TrackerError::NoActiveIntervention)?;
        let mut dataset = self.dataset.write();
        let log = dataset
            .urge_logs
            .iter_mut()
            .find(|log| log.id == active.log_id)
            .ok_or(TrackerError::NoActiveIntervention)?;
        update(log);
        Ok(log.clone())
    }

    pub fn day_status(&self, task_id: &str, day: NaiveDate) -> Result<DayStatus, TrackerError> {
        let task = self.task(task_id)?;
        let dataset = self.dataset.read();
        Ok(resolve_day_status(
            &task,
            day,
            &dataset.urge_logs,
            &dataset.check_in_records,
            self.today(),
        ))
    }

    pub fn streak(&self, task_id: &str) -> Result<u32, TrackerError> {
        let task = self.task(task_id)?;
        let dataset = self.dataset.read();
        Ok(task_streak(
            &task,
            self.today(),
            &dataset.urge_logs,
            &dataset.check_in_records,
        ))
    }

    pub fn progress(&self) -> Vec<TaskProgress> {
        let dataset = self.dataset.read();
        task_progresses(
            &dataset.tasks,
            &dataset.urge_logs,
            &dataset.check_in_records,
            self.today(),
        )
    }

    pub fn range_view(&self, days: usize) -> RangeView {
        let dataset = self.dataset.read();
        view::range_view(
            &dataset.tasks,
            &dataset.urge_logs,
            &dataset.check_in_records,
            self.today(),
            days,
        )
    }

    pub fn week_view(&self, anchor: NaiveDate) -> WeekView {
        let dataset = self.dataset.read();
        view::week_view(
            &dataset.tasks,
            &dataset.urge_logs,
            &dataset.check_in_records,
            anchor,
            self.today(),
        )
    }

    pub fn month_view(&self, anchor: NaiveDate) -> MonthView {
        let dataset = self.dataset.read();
        view::month_view(
            &dataset.tasks,
            &dataset.urge_logs,
            &dataset.check_in_records,
            anchor,
            self.today(),
        )
    }

    pub fn task_stats(&self) -> Vec<TaskStats> {
        let dataset = self.dataset.read();
        stats::task_stats(&dataset.tasks, &dataset.urge_logs)
    }

    pub fn recent_tasks(&self) -> Vec<Task> {
        let dataset = self.dataset.read();
        stats::recent_tasks(&dataset.tasks, &dataset.urge_logs, stats::RECENT_TASK_LIMIT)
    }

    pub fn lifecycle(&self, task_id: &str) -> Result<TaskLifecycle, TrackerError> {
        let task = self.task(task_id)?;
        let dataset = self.dataset.read();
        Ok(stats::task_lifecycle(&task, &dataset.check_in_records, self.now()))
    }

    pub fn pursue_completion_rate(&self) -> u32 {
        let dataset = self.dataset.read();
        stats::pursue_completion_rate(&dataset.tasks, &dataset.check_in_records, self.now())
    }

    pub fn urge_count_today(&self) -> usize {
        stats::urge_count_on(&self.dataset.read().urge_logs, self.today())
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        self.dataset.read().clone()
    }

    /// Replaces the whole dataset, e.g. after restoring a backup.
    pub fn restore(&self, snapshot: TrackerSnapshot) {
        *self.intervention.write() = None;
        *self.dataset.write() = snapshot;
    }

    /// Writes the dataset to the configured snapshot path.
    pub fn save(&self) -> Result<TrackerSnapshot> {
        let path = self
            .snapshot_path
            .as_ref()
            .ok_or_else(|| anyhow!("no snapshot path configured"))?;
        let mut dataset = self.dataset.write();
        dataset.last_sync_at = Some(self.now());
        dataset.save(path)?;
        tracing::info!(path = %path.display(), "snapshot saved");
        Ok(dataset.clone())
    }
}
