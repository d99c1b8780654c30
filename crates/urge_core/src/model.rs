use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a task is a habit to refrain from or one to perform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskKind {
    #[serde(rename = "DONT_WANT")]
    Avoid,
    #[serde(rename = "DO_WANT")]
    Pursue,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodKind {
    #[default]
    Daily,
    Weekly,
    Custom,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterventionKind {
    Timer,
    Breathe,
    Dump,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Resisted,
    Relapsed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub is_enabled: bool,
    /// Inclusive lower bound of the validity window.
    #[serde(with = "ts_milliseconds")]
    pub start_date: DateTime<Utc>,
    /// Inclusive upper bound of the validity window.
    #[serde(with = "ts_milliseconds")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub period_type: PeriodKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_completion: Option<u32>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: TaskKind,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            is_enabled: true,
            start_date,
            end_date,
            period_type: PeriodKind::Daily,
            custom_days: None,
            target_completion: None,
        }
    }

    pub fn with_target(mut self, target: u32) -> Self {
        self.target_completion = Some(target);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.is_enabled = false;
        self
    }

    /// Instant-level window test; both bounds are inclusive.
    pub fn covers(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start_date && instant <= self.end_date
    }
}

/// One urge event recorded while the user went through an intervention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UrgeLog {
    pub id: String,
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub assigned_intervention: InterventionKind,
    pub is_completed: bool,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognitive_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl UrgeLog {
    pub fn belongs_to(&self, task_id: &str) -> bool {
        self.task_id.as_deref() == Some(task_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    pub id: String,
    pub task_id: String,
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub is_completed: bool,
    /// `YYYY-MM-DD` of the local day the record was written for.
    pub date_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn task_uses_persisted_field_names() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        let task = Task::new("4", "Read for 30 minutes", TaskKind::Pursue, start, end).with_target(30);

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["type"], "DO_WANT");
        assert_eq!(value["isEnabled"], true);
        assert_eq!(value["periodType"], "DAILY");
        assert_eq!(value["startDate"], start.timestamp_millis());
        assert_eq!(value["targetCompletion"], 30);
        assert!(value.get("customDays").is_none());
    }

    #[test]
    fn urge_log_accepts_null_outcome_and_missing_task() {
        let raw = r#"{
            "id": "1730000000000",
            "timestamp": 1730000000000,
            "assignedIntervention": "BREATHE",
            "isCompleted": false,
            "outcome": null
        }"#;
        let log: UrgeLog = serde_json::from_str(raw).unwrap();
        assert_eq!(log.assigned_intervention, InterventionKind::Breathe);
        assert!(log.outcome.is_none());
        assert!(log.task_id.is_none());
        assert!(!log.belongs_to("1"));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap();
        let task = Task::new("1", "No snacks", TaskKind::Avoid, start, end);
        assert!(task.covers(start));
        assert!(task.covers(end));
        assert!(!task.covers(end + chrono::Duration::milliseconds(1)));
    }
}
