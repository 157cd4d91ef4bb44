use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::error::BackdateError;
use crate::model::WorkingHours;
use crate::schedule::ScheduleSettings;
use crate::writer::{PublishSettings, WriterSettings, DEFAULT_AUTHOR_NAME};

#[derive(Parser, Debug)]
#[command(name = "backdate")]
#[command(about = "Generate a backdated git commit history and optionally push it")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        env = "BACKDATE_REPOSITORY",
        help = "Remote repository URL to push to (omit to keep commits local)"
    )]
    pub repository: Option<String>,

    #[arg(
        long = "max_commits",
        alias = "max-commits",
        default_value_t = 3,
        allow_negative_numbers = true,
        help = "Maximum commits per day"
    )]
    pub max_commits: i64,

    #[arg(
        long,
        default_value_t = 70,
        allow_negative_numbers = true,
        help = "Percentage of days to be active (1-100)"
    )]
    pub frequency: i64,

    #[arg(
        long = "days_before",
        alias = "days-before",
        default_value_t = 365,
        help = "Days before today to start"
    )]
    pub days_before: u32,

    #[arg(
        long = "days_after",
        alias = "days-after",
        default_value_t = 0,
        help = "Days after today to continue"
    )]
    pub days_after: u32,

    #[arg(long = "no_weekends", alias = "no-weekends", help = "Skip Saturdays and Sundays")]
    pub no_weekends: bool,

    #[arg(
        long,
        env = "BACKDATE_WORKDIR",
        help = "Directory of the repository to write (default: current dir)"
    )]
    pub workdir: Option<PathBuf>,

    #[arg(long, default_value = "origin", help = "Remote name used when pushing")]
    pub remote: String,

    #[arg(long, default_value = "main", help = "Branch name used when pushing")]
    pub branch: String,

    #[arg(
        long = "author_name",
        alias = "author-name",
        default_value = DEFAULT_AUTHOR_NAME,
        help = "user.name set on a freshly initialized repository"
    )]
    pub author_name: String,

    #[arg(
        long = "author_email",
        alias = "author-email",
        help = "user.email set on a freshly initialized repository"
    )]
    pub author_email: Option<String>,

    #[arg(
        long = "work_start",
        alias = "work-start",
        default_value_t = 9,
        help = "First hour of the working day (0-23)"
    )]
    pub work_start: u32,

    #[arg(
        long = "work_end",
        alias = "work-end",
        default_value_t = 18,
        help = "Last hour of the working day (0-23, inclusive)"
    )]
    pub work_end: u32,

    #[arg(long, help = "Seed for reproducible day and time selection")]
    pub seed: Option<u64>,

    #[arg(
        long = "dry_run",
        alias = "dry-run",
        help = "Plan the history without writing files or running git"
    )]
    pub dry_run: bool,

    #[arg(long, help = "Output a JSON run summary")]
    pub json: bool,

    #[arg(short, long, help = "Enable debug logging on stderr")]
    pub verbose: bool,
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub schedule: ScheduleSettings,
    pub writer: WriterSettings,
    pub publish: Option<PublishSettings>,
    pub workdir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub json: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn settings(&self) -> std::result::Result<GeneratorSettings, BackdateError> {
        if self.max_commits < 1 {
            return Err(BackdateError::Validation(
                "max_commits must be at least 1".to_string(),
            ));
        }
        let max_commits = u32::try_from(self.max_commits).map_err(|_| {
            BackdateError::Validation(format!("max_commits is too large: {}", self.max_commits))
        })?;

        if !(1..=100).contains(&self.frequency) {
            return Err(BackdateError::Validation(
                "frequency must be between 1 and 100".to_string(),
            ));
        }

        let hours = WorkingHours::new(self.work_start, self.work_end)?;

        let publish = self
            .repository
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| PublishSettings {
                repository: url.to_string(),
                remote: self.remote.clone(),
                branch: self.branch.clone(),
            });

        Ok(GeneratorSettings {
            schedule: ScheduleSettings {
                days_before: self.days_before,
                days_after: self.days_after,
                frequency: self.frequency as u32,
                exclude_weekends: self.no_weekends,
            },
            writer: WriterSettings {
                max_commits,
                hours,
                author_name: self.author_name.clone(),
                author_email: self.author_email.clone(),
                dry_run: self.dry_run,
            },
            publish,
            workdir: self.workdir.clone(),
            seed: self.seed,
            json: self.json,
        })
    }

    pub fn execute(self) -> Result<()> {
        let settings = self.settings()?;
        crate::generate::exec(settings)
    }
}
