use anyhow::Context;
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::cli::GeneratorSettings;
use crate::git::GitRepo;
use crate::model::RunSummary;
use crate::report::{output_json, Reporter};
use crate::schedule::Schedule;
use crate::writer::HistoryWriter;

pub fn exec(settings: GeneratorSettings) -> anyhow::Result<()> {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let today = Local::now().date_naive();
    let schedule = Schedule::plan(today, &settings.schedule, &mut rng)
        .context("Failed to plan activity window")?;
    let repo = GitRepo::open(settings.workdir.as_ref()).context("Failed to resolve working directory")?;
    debug!(workdir = %repo.path().display(), %today, "starting run");

    let reporter = Reporter::new(settings.json, settings.writer.dry_run);
    reporter.window(&schedule);

    let mut summary = RunSummary::new(
        repo.path(),
        settings.writer.dry_run,
        schedule.window,
        schedule.candidates.len(),
    );

    let mut writer = HistoryWriter::new(&repo, &settings.writer, &mut rng);
    writer.prepare();

    let pb = reporter.progress(schedule.active.len());
    for date in &schedule.active {
        let day = writer.write_day(*date);
        reporter.day(&pb, &day);
        summary.record_day(day);
        pb.inc(1);
    }
    pb.finish_and_clear();
    reporter.totals(&summary);

    match &settings.publish {
        Some(publish) => {
            reporter.publishing(publish);
            let outcome = writer.publish(publish);
            reporter.published(&outcome);
            summary.publish = Some(outcome);
        }
        None => reporter.test_mode(),
    }

    if settings.json {
        output_json(&summary)?;
    }

    Ok(())
}
