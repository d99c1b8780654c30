use thiserror::Error;

use crate::day::DayKey;

/// Rejections raised by dataset mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("task `{0}` not found")]
    TaskNotFound(String),

    #[error("task `{0}` is outside its validity window")]
    TaskNotActive(String),

    #[error("task `{task_id}` already checked in on {day}")]
    AlreadyCheckedIn { task_id: String, day: DayKey },

    #[error("task window starts after it ends")]
    InvalidWindow,

    #[error("no intervention in progress")]
    NoActiveIntervention,
}
