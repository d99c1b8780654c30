//! Streak and calendar derivation for an urge and habit tracker.
//!
//! The derivation modules are pure functions over plain data; the
//! [`TrackerService`] holds one dataset and feeds it through them.

pub mod clock;
pub mod day;
pub mod error;
pub mod model;
pub mod service;
pub mod snapshot;
pub mod stats;
pub mod status;
pub mod streak;
pub mod time_state;
pub mod view;

#[cfg(test)]
mod fixtures;

pub use crate::error::TrackerError;
pub use crate::service::{NewTask, TrackerService, TrackerServiceBuilder};
pub use crate::snapshot::TrackerSnapshot;
