use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;
use crate::model::{DayOutcome, PublishOutcome, RunSummary};
use crate::schedule::Schedule;
use crate::writer::PublishSettings;

/// Console output for a run. With `quiet` set (JSON mode) nothing but the
/// final JSON document reaches stdout.
pub struct Reporter {
    quiet: bool,
    dry_run: bool,
}

impl Reporter {
    pub fn new(quiet: bool, dry_run: bool) -> Self {
        Self { quiet, dry_run }
    }

    pub fn window(&self, schedule: &Schedule) {
        if self.quiet {
            return;
        }
        println!(
            "Generating activity from {} to {}",
            style(schedule.window.start.format("%Y-%m-%d")).cyan(),
            style(schedule.window.end.format("%Y-%m-%d")).cyan()
        );
        println!(
            "Target active days: {} out of {} days",
            style(schedule.active.len()).bold(),
            schedule.candidates.len()
        );
        if self.dry_run {
            println!("{}", style("Dry run: no files or commits will be written").yellow());
        }
    }

    pub fn progress(&self, days: usize) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(days as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} days")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    }

    pub fn day(&self, pb: &ProgressBar, day: &DayOutcome) {
        if self.quiet {
            return;
        }
        let date = day.date.format("%Y-%m-%d");
        pb.suspend(|| {
            if self.dry_run {
                println!("Planned {} commit(s) for {}", day.planned(), date);
            } else if day.committed() == day.planned() {
                println!("Created {} commit(s) for {}", day.committed(), date);
            } else {
                println!(
                    "Created {} of {} commit(s) for {}",
                    style(day.committed()).red(),
                    day.planned(),
                    date
                );
            }
        });
    }

    pub fn totals(&self, summary: &RunSummary) {
        if self.quiet {
            return;
        }
        println!();
        println!(
            "Generated {} active days with {} commit(s)",
            style(summary.days.len()).bold(),
            style(if self.dry_run { summary.commits_planned } else { summary.commits_created }).bold()
        );
    }

    pub fn publishing(&self, publish: &PublishSettings) {
        if self.quiet {
            return;
        }
        println!();
        println!("Pushing to repository: {}", style(&publish.repository).cyan());
    }

    pub fn published(&self, outcome: &PublishOutcome) {
        if self.quiet || self.dry_run {
            return;
        }
        if outcome.pushed {
            println!("{}", style("Successfully pushed!").green());
            println!("Wait 2-5 minutes for the contribution graph to update");
        } else {
            println!("{}", style("Failed to push to repository").red());
        }
    }

    pub fn test_mode(&self) {
        if self.quiet {
            return;
        }
        println!();
        println!("{}", style("Test mode: commits generated locally but not pushed").yellow());
        println!("To push later, add: --repository=git@github.com:username/repo.git");
    }
}

pub fn output_json(summary: &RunSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
