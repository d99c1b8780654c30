use std::iter;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{resolve_view_day, ViewDay};
use crate::model::{CheckInRecord, Task, UrgeLog};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RangeView {
    pub days: Vec<ViewDay>,
    pub tasks: Vec<Task>,
}

/// The `count` consecutive days ending at `last`, oldest first.
///
/// Stops early at the earliest representable date.
pub fn date_range(last: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = iter::successors(Some(last), |day| day.pred_opt())
        .take(count)
        .collect();
    days.reverse();
    days
}

/// Rolling window of `count` days ending at (and including) `today`.
///
/// Every given task is resolved, enabled or not.
pub fn range_view(
    tasks: &[Task],
    urge_logs: &[UrgeLog],
    check_ins: &[CheckInRecord],
    today: NaiveDate,
    count: usize,
) -> RangeView {
    let days = date_range(today, count)
        .into_iter()
        .map(|day| resolve_view_day(day, tasks, urge_logs, check_ins, today))
        .collect();
    RangeView {
        days,
        tasks: tasks.to_vec(),
    }
}
