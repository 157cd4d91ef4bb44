//! Turns scheduled days into commits and optionally publishes them.

use chrono::NaiveDate;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{CommitOutcome, CommitRecord, DayOutcome, PublishOutcome, WorkingHours};

pub const DEFAULT_AUTHOR_NAME: &str = "GitHub Activity Generator";

#[derive(Debug, Clone)]
pub struct WriterSettings {
    pub max_commits: u32,
    pub hours: WorkingHours,
    pub author_name: String,
    pub author_email: Option<String>,
    pub dry_run: bool,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            max_commits: 3,
            hours: WorkingHours::default(),
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_email: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    pub repository: String,
    pub remote: String,
    pub branch: String,
}

pub struct HistoryWriter<'a, R: Rng + ?Sized> {
    repo: &'a GitRepo,
    settings: &'a WriterSettings,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> HistoryWriter<'a, R> {
    pub fn new(repo: &'a GitRepo, settings: &'a WriterSettings, rng: &'a mut R) -> Self {
        Self { repo, settings, rng }
    }

    /// Creates the work tree and initializes git in it if needed.
    /// Failures are logged; the run carries on regardless.
    pub fn prepare(&self) -> bool {
        if self.settings.dry_run {
            return true;
        }
        let result = self.repo.create_workdir().and_then(|_| {
            self.repo.init_if_missing(
                &self.settings.author_name,
                self.settings.author_email.as_deref(),
            )
        });
        match result {
            Ok(_) => true,
            Err(e) => {
                warn!(path = %self.repo.path().display(), "repository setup failed: {e}");
                false
            }
        }
    }

    pub fn commit_count(&mut self) -> u32 {
        self.rng.gen_range(1..=self.settings.max_commits.max(1))
    }

    /// Draws the commit count, then a time and a content token for each
    /// commit. Dry runs consume the RNG identically.
    pub fn write_day(&mut self, date: NaiveDate) -> DayOutcome {
        let count = self.commit_count();
        let mut commits = Vec::with_capacity(count as usize);
        for index in 0..count {
            let time = self.settings.hours.sample(&mut *self.rng);
            let token: u32 = self.rng.gen_range(1000..=9999);
            let record = CommitRecord::new(date, index, time);
            let committed = self.commit_operation(&record, token);
            commits.push(CommitOutcome {
                index,
                artifact: record.artifact_name(),
                timestamp: record.timestamp,
                committed,
            });
        }
        debug!(%date, planned = count, "day written");
        DayOutcome { date, commits }
    }

    /// Write, stage and commit one artifact. `false` on any failure; in a
    /// dry run nothing is executed and `false` is returned.
    pub fn commit_operation(&self, record: &CommitRecord, token: u32) -> bool {
        if self.settings.dry_run {
            return false;
        }
        match self.try_commit(record, token) {
            Ok(()) => true,
            Err(e) => {
                warn!(artifact = %record.artifact_name(), "{e}");
                false
            }
        }
    }

    fn try_commit(&self, record: &CommitRecord, token: u32) -> Result<()> {
        let path = record.artifact_path(self.repo.path());
        std::fs::write(&path, record.contents(token))?;
        self.repo.stage(&path)?;
        self.repo.commit_at(&record.message(), record.timestamp)?;
        debug!(artifact = %record.artifact_name(), timestamp = %record.timestamp, "committed");
        Ok(())
    }

    /// `remote add`, `branch -M`, `push -u`, in that order. Every step is
    /// attempted even if an earlier one failed.
    pub fn publish(&self, publish: &PublishSettings) -> PublishOutcome {
        let mut outcome = PublishOutcome {
            repository: publish.repository.clone(),
            ..PublishOutcome::default()
        };
        if self.settings.dry_run {
            return outcome;
        }

        outcome.remote_added = report_step(
            "remote add",
            self.repo.add_remote(&publish.remote, &publish.repository),
        );
        outcome.branch_renamed =
            report_step("branch rename", self.repo.rename_branch(&publish.branch));
        outcome.pushed = report_step(
            "push",
            self.repo.push_upstream(&publish.remote, &publish.branch),
        );
        if outcome.pushed {
            info!(remote = %publish.remote, branch = %publish.branch, "pushed history");
        }
        outcome
    }
}

fn report_step(step: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("{step} failed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::command::{git_command, has_git};
    use chrono::{NaiveTime, Timelike};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn commit_count(dir: &std::path::Path) -> usize {
        git_command(["rev-list", "--count", "HEAD"], dir, &[])
            .unwrap()
            .parse()
            .unwrap()
    }

    fn settings(max_commits: u32) -> WriterSettings {
        WriterSettings {
            max_commits,
            author_email: Some("test@example.com".to_string()),
            ..WriterSettings::default()
        }
    }

    #[test]
    fn commit_count_stays_in_range() {
        let dir = tempdir().unwrap();
        let repo = GitRepo::open(Some(dir.path())).unwrap();
        let s = settings(4);
        let mut rng = StdRng::seed_from_u64(11);
        let mut writer = HistoryWriter::new(&repo, &s, &mut rng);
        let mut seen = [false; 5];
        for _ in 0..500 {
            let n = writer.commit_count();
            assert!((1..=4).contains(&n));
            seen[n as usize] = true;
        }
        assert_eq!(seen, [false, true, true, true, true]);
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempdir().unwrap();
        let workdir = dir.path().join("repo");
        let repo = GitRepo::open(Some(&workdir)).unwrap();
        let s = WriterSettings {
            dry_run: true,
            ..settings(3)
        };
        let mut rng = StdRng::seed_from_u64(5);
        let mut writer = HistoryWriter::new(&repo, &s, &mut rng);

        assert!(writer.prepare());
        let day = writer.write_day(date(2022, 8, 1));
        assert!((1..=3).contains(&day.planned()));
        assert_eq!(day.committed(), 0);
        let publish = writer.publish(&PublishSettings {
            repository: "git@example.com:me/repo.git".into(),
            remote: "origin".into(),
            branch: "main".into(),
        });
        assert!(!publish.pushed);
        assert!(!workdir.exists());
    }

    #[test]
    fn writes_one_commit_per_operation() {
        if !has_git() {
            return;
        }
        let dir = tempdir().unwrap();
        let repo = GitRepo::open(Some(dir.path())).unwrap();
        let s = settings(1);
        let mut rng = StdRng::seed_from_u64(9);
        let mut writer = HistoryWriter::new(&repo, &s, &mut rng);
        assert!(writer.prepare());

        let days = [date(2022, 1, 3), date(2022, 1, 4), date(2022, 1, 7)];
        for d in days {
            let outcome = writer.write_day(d);
            assert_eq!(outcome.planned(), 1);
            assert_eq!(outcome.committed(), 1);
            let commit = &outcome.commits[0];
            assert_eq!(commit.timestamp.date(), d);
            assert!(s.hours.contains(commit.timestamp.time()));
        }

        assert_eq!(commit_count(dir.path()), 3);
        let content = std::fs::read_to_string(dir.path().join("data_20220104_0.txt")).unwrap();
        assert!(content.starts_with("Commit 1 on 2022-01-04\nRandom data: "));

        let log = git_command(
            ["log", "--reverse", "--format=%s|%ad", "--date=format-local:%Y-%m-%d %H"],
            dir.path(),
            &[],
        )
        .unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 3);
        for (line, d) in lines.iter().zip(days) {
            let (subject, when) = line.split_once('|').unwrap();
            assert_eq!(subject, format!("Activity on {}", d.format("%Y-%m-%d")));
            let hour: u32 = when[11..].parse().unwrap();
            assert!((9..=18).contains(&hour));
            assert!(when.starts_with(&d.format("%Y-%m-%d").to_string()));
        }
    }

    #[test]
    fn failed_commit_does_not_stop_the_day() {
        if !has_git() {
            return;
        }
        let dir = tempdir().unwrap();
        let repo = GitRepo::open(Some(dir.path())).unwrap();
        let s = settings(1);
        let mut rng = StdRng::seed_from_u64(2);
        let mut writer = HistoryWriter::new(&repo, &s, &mut rng);
        // no prepare(): staging fails outside a repository
        let outcome = writer.write_day(date(2022, 2, 1));
        assert_eq!(outcome.planned(), 1);
        assert_eq!(outcome.committed(), 0);
        assert!(dir.path().join("data_20220201_0.txt").exists());
    }

    #[test]
    fn publish_pushes_to_bare_remote() {
        if !has_git() {
            return;
        }
        let dir = tempdir().unwrap();
        let remote = dir.path().join("remote.git");
        git_command(
            [std::ffi::OsStr::new("init"), std::ffi::OsStr::new("--bare"), remote.as_os_str()],
            dir.path(),
            &[],
        )
        .unwrap();

        let work = dir.path().join("work");
        let repo = GitRepo::open(Some(&work)).unwrap();
        let s = settings(2);
        let mut rng = StdRng::seed_from_u64(4);
        let mut writer = HistoryWriter::new(&repo, &s, &mut rng);
        assert!(writer.prepare());
        let day = writer.write_day(date(2023, 3, 3));
        assert!(day.committed() >= 1);

        let outcome = writer.publish(&PublishSettings {
            repository: remote.to_string_lossy().to_string(),
            remote: "origin".into(),
            branch: "main".into(),
        });
        assert!(outcome.remote_added);
        assert!(outcome.branch_renamed);
        assert!(outcome.pushed);

        let count = git_command(["rev-list", "--count", "main"], &remote, &[]).unwrap();
        assert_eq!(count, day.committed().to_string());
    }

    #[test]
    fn publish_failure_is_reported_not_fatal() {
        if !has_git() {
            return;
        }
        let dir = tempdir().unwrap();
        let repo = GitRepo::open(Some(dir.path())).unwrap();
        let s = settings(1);
        let mut rng = StdRng::seed_from_u64(4);
        let mut writer = HistoryWriter::new(&repo, &s, &mut rng);
        assert!(writer.prepare());
        writer.write_day(date(2023, 3, 3));

        let missing = dir.path().join("does-not-exist.git");
        let outcome = writer.publish(&PublishSettings {
            repository: missing.to_string_lossy().to_string(),
            remote: "origin".into(),
            branch: "main".into(),
        });
        assert!(outcome.remote_added);
        assert!(!outcome.pushed);
    }

    #[test]
    fn sampled_times_cover_window_bounds() {
        let hours = WorkingHours::default();
        let mut rng = StdRng::seed_from_u64(0);
        let times: Vec<NaiveTime> = (0..5000).map(|_| hours.sample(&mut rng)).collect();
        assert!(times.iter().any(|t| t.hour() == 9));
        assert!(times.iter().any(|t| t.hour() == 18));
        assert!(times.iter().all(|t| (9..=18).contains(&t.hour())));
    }

    #[test]
    fn every_drawn_commit_is_recorded() {
        let dir = tempdir().unwrap();
        let repo = GitRepo::open(Some(dir.path().join("repo"))).unwrap();
        let s = WriterSettings {
            dry_run: true,
            ..settings(5)
        };
        let mut rng = StdRng::seed_from_u64(21);
        let mut writer = HistoryWriter::new(&repo, &s, &mut rng);
        for offset in 0..50 {
            let day = writer.write_day(date(2022, 1, 1) + chrono::Days::new(offset));
            assert!((1..=5).contains(&day.planned()));
            let indices: Vec<u32> = day.commits.iter().map(|c| c.index).collect();
            assert_eq!(indices, (0..day.planned() as u32).collect::<Vec<_>>());
        }
    }

    #[test]
    fn seeded_dry_run_matches_real_run() {
        if !has_git() {
            return;
        }
        let days: Vec<NaiveDate> = (1..=10).map(|d| date(2022, 5, d)).collect();
        let plan = |dry_run: bool, workdir: &std::path::Path| {
            let repo = GitRepo::open(Some(workdir)).unwrap();
            let s = WriterSettings {
                dry_run,
                ..settings(3)
            };
            let mut rng = StdRng::seed_from_u64(17);
            let mut writer = HistoryWriter::new(&repo, &s, &mut rng);
            assert!(writer.prepare());
            days.iter()
                .map(|d| {
                    let day = writer.write_day(*d);
                    let stamps: Vec<_> = day.commits.iter().map(|c| c.timestamp).collect();
                    (day.date, stamps)
                })
                .collect::<Vec<_>>()
        };

        let dir = tempdir().unwrap();
        let real = plan(false, &dir.path().join("real"));
        let dry = plan(true, &dir.path().join("dry"));
        assert_eq!(real, dry);

        let total: usize = real.iter().map(|(_, stamps)| stamps.len()).sum();
        assert_eq!(commit_count(&dir.path().join("real")), total);
        assert!(!dir.path().join("dry").exists());
    }
}
