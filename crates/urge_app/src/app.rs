use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use tracing::{debug, info};
use urge_core::{
    day::parse_day,
    status::DayStatus,
    streak::TaskProgress,
    view::{month::DayTone, MonthView, RangeView, ViewDay, WeekView},
    TrackerService,
};

const DEFAULT_DATA_FILE: &str = "urge_tracker.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportView {
    Range,
    #[default]
    Week,
    Month,
    Progress,
}

impl FromStr for ReportView {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "range" => Ok(ReportView::Range),
            "week" => Ok(ReportView::Week),
            "month" => Ok(ReportView::Month),
            "progress" => Ok(ReportView::Progress),
            other => bail!("unknown report view `{other}`"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) data_file: PathBuf,
    pub(crate) view: ReportView,
    pub(crate) range_days: usize,
    pub(crate) anchor: Option<NaiveDate>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("URGE_DATA_FILE") {
            if !path.trim().is_empty() {
                config.data_file = PathBuf::from(path);
            }
        }
        if let Ok(view) = std::env::var("URGE_VIEW") {
            match view.parse::<ReportView>() {
                Ok(value) => config.view = value,
                Err(err) => debug!(%err, "ignoring URGE_VIEW"),
            }
        }
        if let Ok(days) = std::env::var("URGE_RANGE_DAYS") {
            if let Ok(value) = days.trim().parse::<usize>() {
                if value > 0 {
                    config.range_days = value;
                }
            }
        }
        if let Ok(anchor) = std::env::var("URGE_ANCHOR") {
            config.anchor = parse_day(&anchor);
        }
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            view: ReportView::default(),
            range_days: 30,
            anchor: None,
        }
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    info!(path = %config.data_file.display(), view = ?config.view, "loading tracker data");
    let service = TrackerService::builder()
        .with_snapshot_path(&config.data_file)
        .build()?;
    print!("{}", render(&service, &config));
    Ok(())
}

pub fn render(service: &TrackerService, config: &AppConfig) -> String {
    let anchor = config.anchor.unwrap_or_else(|| service.today());
    match config.view {
        ReportView::Range => render_range(&service.range_view(config.range_days)),
        ReportView::Week => render_week(&service.week_view(anchor)),
        ReportView::Month => render_month(&service.month_view(anchor)),
        ReportView::Progress => render_progress(&service.progress()),
    }
}

fn status_mark(status: DayStatus) -> char {
    match status {
        DayStatus::Success => '+',
        DayStatus::Failure => 'x',
        DayStatus::Pending => '.',
        DayStatus::OutOfRange => ' ',
    }
}

fn tone_mark(tone: DayTone) -> char {
    match tone {
        DayTone::AllSucceeded => '*',
        DayTone::NeedsAttention => '!',
        DayTone::Quiet | DayTone::OutsideMonth => ' ',
    }
}

fn day_line(out: &mut String, day: &ViewDay) {
    let today = if day.is_today { " <" } else { "" };
    let _ = writeln!(
        out,
        "{} {}  {}{}",
        day.weekday_label(),
        day.date_key,
        day.summary.describe(),
        today
    );
    for state in &day.task_states {
        let _ = writeln!(out, "    [{}] {}", status_mark(state.status), state.task_name);
    }
}

pub fn render_range(view: &RangeView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Last {} days, {} tasks", view.days.len(), view.tasks.len());
    for day in &view.days {
        day_line(&mut out, day);
    }
    out
}

pub fn render_week(view: &WeekView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Week {} of {} ({})",
        view.week_number,
        view.year,
        view.range_label()
    );
    for day in &view.days {
        day_line(&mut out, day);
    }
    out
}

pub fn render_month(view: &MonthView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", view.month_name, view.year);
    out.push_str(" Sun  Mon  Tue  Wed  Thu  Fri  Sat\n");
    for week in view.days.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| {
                if cell.is_current_month {
                    format!("{:>3}{}", cell.day.day_number, tone_mark(cell.tone))
                } else {
                    "    ".to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "{}", row.join(" ").trim_end());
    }
    out
}

pub fn render_progress(progress: &[TaskProgress]) -> String {
    if progress.is_empty() {
        return "No enabled tasks\n".to_string();
    }
    let mut out = String::new();
    for entry in progress {
        let unit = if entry.streak_days == 1 { "day" } else { "days" };
        let _ = writeln!(out, "{:>4} {}  {}", entry.streak_days, unit, entry.task_name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use urge_core::clock::FixedClock;
    use urge_core::day::{day_end, day_start, local_instant};
    use urge_core::model::TaskKind;
    use urge_core::NewTask;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service_with_reading(today: NaiveDate) -> TrackerService {
        let now = local_instant(today, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        let service = TrackerService::builder()
            .with_clock(Box::new(FixedClock::new(now)))
            .build()
            .unwrap();
        let task = service
            .add_task(
                NewTask::new("Read", TaskKind::Pursue)
                    .window(day_start(date(2025, 6, 2)), day_end(date(2025, 6, 30))),
            )
            .unwrap();
        service.check_in(&task.id).unwrap();
        service
    }

    #[test]
    fn report_view_parses_case_insensitively() {
        assert_eq!("Month".parse::<ReportView>().unwrap(), ReportView::Month);
        assert_eq!(" progress ".parse::<ReportView>().unwrap(), ReportView::Progress);
        assert!("agenda".parse::<ReportView>().is_err());
    }

    #[test]
    fn week_report_marks_today() {
        let today = date(2025, 6, 4);
        let service = service_with_reading(today);
        let config = AppConfig::default();
        let text = render(&service, &config);
        assert!(text.starts_with("Week 23 of 2025 (Jun 1 - 7)"));
        assert!(text.contains("Sun 2025-06-01  no tasks\n"));
        assert!(text.contains("Tue 2025-06-03  1 missed\n"));
        assert!(text.contains("Wed 2025-06-04  1 done <\n    [+] Read\n"));
    }

    #[test]
    fn month_report_uses_tone_marks() {
        let today = date(2025, 6, 4);
        let service = service_with_reading(today);
        let config = AppConfig {
            view: ReportView::Month,
            ..AppConfig::default()
        };
        let text = render(&service, &config);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "June 2025");
        assert_eq!(lines[2], "  1    2!   3!   4*   5!   6!   7!");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn progress_report_lists_streaks() {
        let service = service_with_reading(date(2025, 6, 4));
        assert_eq!(render_progress(&service.progress()), "   1 day  Read\n");
        assert_eq!(render_progress(&[]), "No enabled tasks\n");
    }
}
