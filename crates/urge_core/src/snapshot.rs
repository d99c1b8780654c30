use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::serde::ts_milliseconds_option;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::model::{CheckInRecord, Task, UrgeLog};

/// Plain data snapshot of one dataset, as exchanged with backup storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub urge_logs: Vec<UrgeLog>,
    #[serde(default)]
    pub check_in_records: Vec<CheckInRecord>,
    #[serde(default, with = "ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl TrackerSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.urge_logs.is_empty() && self.check_in_records.is_empty()
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("malformed tracker snapshot")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("unable to encode tracker snapshot")
    }

    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("unable to read snapshot `{}`", path.display()))?;
        let snapshot = Self::from_json(&raw)
            .with_context(|| format!("unable to parse snapshot `{}`", path.display()))?;
        tracing::debug!(
            tasks = snapshot.tasks.len(),
            urge_logs = snapshot.urge_logs.len(),
            check_ins = snapshot.check_in_records.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Like [`TrackerSnapshot::load`], but a missing file yields an empty dataset.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no snapshot yet, starting empty");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    #[instrument(skip(self))]
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)
            .with_context(|| format!("unable to write snapshot `{}`", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_persisted_store_layout() {
        let raw = r#"{
            "tasks": [{
                "id": "1",
                "name": "No short videos",
                "type": "DONT_WANT",
                "isEnabled": true,
                "startDate": 1735689600000,
                "endDate": 1738281600000,
                "periodType": "DAILY"
            }],
            "urgeLogs": [{
                "id": "u1",
                "timestamp": 1735776000000,
                "assignedIntervention": "DUMP",
                "isCompleted": true,
                "outcome": "resisted",
                "cognitiveTag": "boredom",
                "taskId": "1"
            }],
            "checkInRecords": []
        }"#;
        let snapshot = TrackerSnapshot::from_json(raw).unwrap();
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.urge_logs[0].cognitive_tag.as_deref(), Some("boredom"));
        assert!(snapshot.last_sync_at.is_none());
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn rejects_garbage() {
        let err = TrackerSnapshot::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }
}
