use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{BackdateError, Result};

pub const SCHEMA_VERSION: u32 = 1;

/// Inclusive range of calendar days considered for activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ActivityWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(BackdateError::InvalidDate(format!(
                "Invalid range: start ({start}) is after end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Window spanning `days_before` days back and `days_after` days ahead of `today`.
    pub fn around(today: NaiveDate, days_before: u32, days_after: u32) -> Result<Self> {
        let start = today
            .checked_sub_days(Days::new(u64::from(days_before)))
            .ok_or_else(|| {
                BackdateError::InvalidDate(format!(
                    "{days_before} days before {today} is out of range"
                ))
            })?;
        let end = today
            .checked_add_days(Days::new(u64::from(days_after)))
            .ok_or_else(|| {
                BackdateError::InvalidDate(format!(
                    "{days_after} days after {today} is out of range"
                ))
            })?;
        Self::new(start, end)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Hours of the day in which commit timestamps are placed.
///
/// `end_hour` is inclusive: the window runs from `start_hour:00:00`
/// through `end_hour:59:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl WorkingHours {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        if end_hour > 23 {
            return Err(BackdateError::Validation(format!(
                "work_end must be between 0 and 23, got {end_hour}"
            )));
        }
        if start_hour > end_hour {
            return Err(BackdateError::Validation(format!(
                "work_start ({start_hour}) must not be after work_end ({end_hour})"
            )));
        }
        Ok(Self { start_hour, end_hour })
    }

    pub fn first_second(&self) -> u32 {
        self.start_hour * 3600
    }

    pub fn last_second(&self) -> u32 {
        self.end_hour * 3600 + 3599
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        let secs = time.num_seconds_from_midnight();
        self.first_second() <= secs && secs <= self.last_second()
    }

    /// Uniformly random second within the window.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> NaiveTime {
        let secs = rng.gen_range(self.first_second()..=self.last_second());
        // end_hour <= 23 keeps secs below 86_400
        NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap_or_default()
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 18,
        }
    }
}

/// One artifact write plus one commit at an explicit historical timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub date: NaiveDate,
    pub index: u32,
    pub timestamp: NaiveDateTime,
}

impl CommitRecord {
    pub fn new(date: NaiveDate, index: u32, time: NaiveTime) -> Self {
        Self {
            date,
            index,
            timestamp: date.and_time(time),
        }
    }

    pub fn artifact_name(&self) -> String {
        format!("data_{}_{}.txt", self.date.format("%Y%m%d"), self.index)
    }

    pub fn artifact_path(&self, workdir: &Path) -> PathBuf {
        workdir.join(self.artifact_name())
    }

    pub fn contents(&self, token: u32) -> String {
        format!(
            "Commit {} on {}\nRandom data: {}\n",
            self.index + 1,
            self.date.format("%Y-%m-%d"),
            token
        )
    }

    pub fn message(&self) -> String {
        format!("Activity on {}", self.date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitOutcome {
    pub index: u32,
    pub artifact: String,
    pub timestamp: NaiveDateTime,
    pub committed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayOutcome {
    pub date: NaiveDate,
    pub commits: Vec<CommitOutcome>,
}

impl DayOutcome {
    pub fn planned(&self) -> usize {
        self.commits.len()
    }

    pub fn committed(&self) -> usize {
        self.commits.iter().filter(|c| c.committed).count()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishOutcome {
    pub repository: String,
    pub remote_added: bool,
    pub branch_renamed: bool,
    pub pushed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub workdir: String,
    pub dry_run: bool,
    pub window: ActivityWindow,
    pub candidate_days: usize,
    pub days: Vec<DayOutcome>,
    pub commits_planned: usize,
    pub commits_created: usize,
    pub publish: Option<PublishOutcome>,
}

impl RunSummary {
    pub fn new(
        workdir: &Path,
        dry_run: bool,
        window: ActivityWindow,
        candidate_days: usize,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            workdir: workdir.to_string_lossy().to_string(),
            dry_run,
            window,
            candidate_days,
            days: Vec::new(),
            commits_planned: 0,
            commits_created: 0,
            publish: None,
        }
    }

    pub fn record_day(&mut self, day: DayOutcome) {
        self.commits_planned += day.planned();
        self.commits_created += day.committed();
        self.days.push(day);
    }
}
