use std::fs;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use tempfile::tempdir;
use urge_core::{
    clock::FixedClock,
    day::{day_end, day_start, local_instant},
    model::{InterventionKind, Outcome, TaskKind},
    status::DayStatus,
    NewTask, TrackerError, TrackerService, TrackerSnapshot,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn morning(day: NaiveDate) -> chrono::DateTime<chrono::Utc> {
    local_instant(day, NaiveTime::from_hms_opt(8, 30, 0).expect("valid time"))
}

#[test]
fn week_of_activity_survives_a_save_and_reload() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("backup").join("tracker.json");

    let first_day = date(2025, 5, 5);
    let clock = Arc::new(FixedClock::new(morning(first_day)));
    let service = TrackerService::builder()
        .with_snapshot_path(&path)
        .with_clock(Box::new(clock.clone()))
        .build()
        .expect("build tracker service");
    assert!(service.snapshot().is_empty());

    let reading = service
        .add_task(
            NewTask::new("Read 20 pages", TaskKind::Pursue)
                .window(day_start(first_day), day_end(date(2025, 5, 31)))
                .target(20),
        )
        .expect("add pursue task");
    let snacks = service
        .add_task(
            NewTask::new("No late snacks", TaskKind::Avoid)
                .window(day_start(first_day), day_end(date(2025, 5, 31))),
        )
        .expect("add avoid task");

    // Mon..Thu: read every day, resist snacks except on Wednesday.
    for offset in 0..4 {
        if offset > 0 {
            clock.advance(Duration::days(1));
        }
        service.check_in(&reading.id).expect("check in");
        service.start_intervention(InterventionKind::Breathe, None);
        service
            .mark_intervention_completed()
            .expect("mark intervention completed");
        let outcome = if offset == 2 {
            Outcome::Relapsed
        } else {
            Outcome::Resisted
        };
        service
            .complete_intervention(outcome, Some(&snacks.id))
            .expect("complete intervention");
    }

    let today = date(2025, 5, 8);
    assert_eq!(service.today(), today);
    assert_eq!(service.streak(&reading.id).expect("streak"), 4);
    assert_eq!(service.streak(&snacks.id).expect("streak"), 1);
    assert_eq!(service.pursue_completion_rate(), 100);
    assert!(matches!(
        service.check_in(&reading.id),
        Err(TrackerError::AlreadyCheckedIn { .. })
    ));

    let saved = service.save().expect("save snapshot");
    assert!(saved.last_sync_at.is_some());
    let raw = fs::read_to_string(&path).expect("read snapshot");
    assert!(raw.contains("\"checkInRecords\""));
    assert!(raw.contains("\"DO_WANT\""));

    let reloaded = TrackerService::builder()
        .with_snapshot_path(&path)
        .with_clock(Box::new(clock.clone()))
        .build()
        .expect("reload tracker service");
    assert_eq!(reloaded.snapshot(), saved);
    assert_eq!(
        reloaded
            .day_status(&snacks.id, date(2025, 5, 7))
            .expect("day status"),
        DayStatus::Failure
    );

    let week = reloaded.week_view(today);
    assert_eq!(week.week_start, date(2025, 5, 4));
    assert_eq!(week.days.len(), 7);
    assert_eq!(week.days[0].summary.describe(), "no tasks");
    assert_eq!(week.days[3].summary.describe(), "1 done, 1 missed");
    assert_eq!(week.days[4].summary.describe(), "2 done");
    assert_eq!(week.days[5].summary.describe(), "2 pending");

    let progress = reloaded.progress();
    assert_eq!(progress[0].task_id, reading.id);
    assert_eq!(progress[0].streak_days, 4);

    let stats = reloaded.task_stats();
    let snack_stats = stats
        .iter()
        .find(|entry| entry.task_id == snacks.id)
        .expect("snack stats");
    assert_eq!(snack_stats.resisted_count, 3);
    assert_eq!(snack_stats.relapsed_count, 1);
    assert_eq!(snack_stats.success_rate, 75);
}

#[test]
fn disabled_tasks_leave_week_view_but_stay_in_range_view() {
    let today = date(2025, 5, 14);
    let clock = Arc::new(FixedClock::new(morning(today)));
    let service = TrackerService::builder()
        .with_clock(Box::new(clock))
        .build()
        .expect("build tracker service");
    let task = service
        .add_task(
            NewTask::new("Stretch", TaskKind::Pursue)
                .window(day_start(date(2025, 5, 1)), day_end(date(2025, 5, 31))),
        )
        .expect("add task");
    service.toggle_task(&task.id).expect("toggle");

    assert!(service.week_view(today).tasks.is_empty());
    assert!(service.month_view(today).tasks.is_empty());
    assert!(service.progress().is_empty());

    let range = service.range_view(7);
    assert_eq!(range.days.len(), 7);
    assert_eq!(range.tasks.len(), 1);
    assert_eq!(range.days[6].summary.pending_count, 1);
}

#[test]
fn missing_snapshot_starts_empty_and_garbage_is_reported() {
    let temp = tempdir().expect("tempdir");
    let missing = temp.path().join("absent.json");
    let service = TrackerService::builder()
        .with_snapshot_path(&missing)
        .build()
        .expect("missing file is fine");
    assert!(service.tasks().is_empty());

    let broken = temp.path().join("broken.json");
    fs::write(&broken, "[1, 2").expect("write garbage");
    assert!(TrackerSnapshot::load(&broken).is_err());
    assert!(TrackerService::builder()
        .with_snapshot_path(&broken)
        .build()
        .is_err());
}
