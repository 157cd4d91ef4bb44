//! Picks the calendar days that receive commits.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::{BackdateError, Result};
use crate::model::ActivityWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    pub days_before: u32,
    pub days_after: u32,
    pub frequency: u32,
    pub exclude_weekends: bool,
}

impl ScheduleSettings {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.frequency) {
            return Err(BackdateError::Validation(
                "frequency must be between 1 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            days_before: 365,
            days_after: 0,
            frequency: 70,
            exclude_weekends: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Schedule {
    pub window: ActivityWindow,
    pub candidates: Vec<NaiveDate>,
    pub active: Vec<NaiveDate>,
}

impl Schedule {
    pub fn plan<R: Rng + ?Sized>(
        today: NaiveDate,
        settings: &ScheduleSettings,
        rng: &mut R,
    ) -> Result<Self> {
        settings.validate()?;
        let window = ActivityWindow::around(today, settings.days_before, settings.days_after)?;
        let candidates = candidate_days(&window, settings.exclude_weekends);
        let active = select_active_days(&candidates, settings.frequency, rng);
        debug!(
            start = %window.start,
            end = %window.end,
            candidates = candidates.len(),
            active = active.len(),
            "planned schedule"
        );
        Ok(Self {
            window,
            candidates,
            active,
        })
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn candidate_days(window: &ActivityWindow, exclude_weekends: bool) -> Vec<NaiveDate> {
    window
        .days()
        .filter(|d| !(exclude_weekends && is_weekend(*d)))
        .collect()
}

/// `floor(candidates * frequency / 100)`.
pub fn active_count(candidates: usize, frequency: u32) -> usize {
    candidates * frequency as usize / 100
}

/// Draws the active days without replacement and returns them ascending.
pub fn select_active_days<R: Rng + ?Sized>(
    candidates: &[NaiveDate],
    frequency: u32,
    rng: &mut R,
) -> Vec<NaiveDate> {
    let count = active_count(candidates.len(), frequency);
    let mut chosen: Vec<NaiveDate> = if count < candidates.len() {
        candidates.choose_multiple(rng, count).copied().collect()
    } else {
        candidates.to_vec()
    };
    chosen.sort_unstable();
    chosen.dedup();
    chosen
}
