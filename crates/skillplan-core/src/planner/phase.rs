//! Phase classification.
//!
//! Active days are banded by how their unrounded share compares with the
//! plan's mean, and contiguous runs of the same band become a [`Phase`].
//! Whole-minute rounding never moves a day between bands. Excluded days are
//! skipped and never split a run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::distribution::DailyPlanItem;
use super::PlannerSettings;

/// Intensity band of an active day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseBand {
    Light,
    Steady,
    Peak,
}

impl PhaseBand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Light => "Warm-up",
            Self::Steady => "Steady",
            Self::Peak => "Peak",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Light => "🌱",
            Self::Steady => "🚶",
            Self::Peak => "🔥",
        }
    }

    /// Band for a day whose ideal share is `share`. A zero mean puts every day in `Steady`.
    pub fn classify(share: f64, mean: f64, settings: &PlannerSettings) -> Self {
        if mean <= 0.0 {
            return Self::Steady;
        }
        let percent = share / mean * 100.0;
        if percent < f64::from(settings.light_below_percent) {
            Self::Light
        } else if percent > f64::from(settings.peak_above_percent) {
            Self::Peak
        } else {
            Self::Steady
        }
    }
}

/// Contiguous run of active days in one band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub emoji: String,
    pub band: PhaseBand,
    /// 1-based position of the first active day in the full item list
    pub start_day: usize,
    /// 1-based position of the last active day in the full item list
    pub end_day: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of active days in the phase
    pub active_days: usize,
    pub avg_minutes_per_day: f64,
    /// Display string of the intensity band, e.g. "70%-130%"
    pub percent_range: String,
}

impl Phase {
    /// Whether a 1-based item position lies within this phase.
    pub fn contains_position(&self, position: usize) -> bool {
        (self.start_day..=self.end_day).contains(&position)
    }
}

struct PhaseRun {
    band: PhaseBand,
    start_day: usize,
    end_day: usize,
    start_date: NaiveDate,
    end_date: NaiveDate,
    days: usize,
    minutes: u64,
    min_percent: u32,
    max_percent: u32,
}

impl PhaseRun {
    fn start(band: PhaseBand, position: usize, item: &DailyPlanItem) -> Self {
        Self {
            band,
            start_day: position,
            end_day: position,
            start_date: item.date,
            end_date: item.date,
            days: 1,
            minutes: u64::from(item.minutes),
            min_percent: item.percent_of_average,
            max_percent: item.percent_of_average,
        }
    }

    fn extend(&mut self, position: usize, item: &DailyPlanItem) {
        self.end_day = position;
        self.end_date = item.date;
        self.days += 1;
        self.minutes += u64::from(item.minutes);
        self.min_percent = self.min_percent.min(item.percent_of_average);
        self.max_percent = self.max_percent.max(item.percent_of_average);
    }

    fn finish(self) -> Phase {
        Phase {
            name: self.band.name().to_string(),
            emoji: self.band.emoji().to_string(),
            band: self.band,
            start_day: self.start_day,
            end_day: self.end_day,
            start_date: self.start_date,
            end_date: self.end_date,
            active_days: self.days,
            avg_minutes_per_day: self.minutes as f64 / self.days as f64,
            percent_range: format!("{}%-{}%", self.min_percent, self.max_percent),
        }
    }
}

/// Group the active days of `items` into phases.
///
/// `shares` holds the unrounded allocation of each active day, in order.
pub fn classify(
    items: &[DailyPlanItem],
    shares: &[f64],
    mean: f64,
    settings: &PlannerSettings,
) -> Vec<Phase> {
    let mut phases = Vec::new();
    let mut current: Option<PhaseRun> = None;

    let active = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_excluded)
        .zip(shares);

    for ((idx, item), &share) in active {
        let position = idx + 1;
        let band = PhaseBand::classify(share, mean, settings);

        if let Some(run) = current.as_mut().filter(|run| run.band == band) {
            run.extend(position, item);
            continue;
        }
        if let Some(run) = current.replace(PhaseRun::start(band, position, item)) {
            phases.push(run.finish());
        }
    }

    if let Some(run) = current {
        phases.push(run.finish());
    }
    phases
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(day: u32, minutes: u32, percent: u32, excluded: bool) -> DailyPlanItem {
        let date = NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
        let mut item = DailyPlanItem::new(date, excluded);
        item.set_minutes(minutes, percent);
        item
    }

    fn shares(items: &[DailyPlanItem]) -> Vec<f64> {
        items
            .iter()
            .filter(|i| !i.is_excluded)
            .map(|i| f64::from(i.minutes))
            .collect()
    }

    #[test]
    fn flat_plan_is_one_steady_phase() {
        let items: Vec<_> = (19..24).map(|d| item(d, 60, 100, false)).collect();
        let phases = classify(&items, &shares(&items), 60.0, &PlannerSettings::default());
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].band, PhaseBand::Steady);
        assert_eq!(phases[0].start_day, 1);
        assert_eq!(phases[0].end_day, 5);
        assert_eq!(phases[0].percent_range, "100%-100%");
    }

    #[test]
    fn ramp_splits_into_three_phases() {
        let items = vec![
            item(19, 30, 50, false),
            item(20, 40, 67, false),
            item(21, 60, 100, false),
            item(22, 0, 0, true),
            item(23, 65, 108, false),
            item(24, 105, 175, false),
        ];
        let phases = classify(&items, &shares(&items), 60.0, &PlannerSettings::default());
        let names: Vec<_> = phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Warm-up", "Steady", "Peak"]);

        // Excluded day 4 sits inside the steady run without splitting it
        assert_eq!(phases[1].start_day, 3);
        assert_eq!(phases[1].end_day, 5);
        assert_eq!(phases[1].active_days, 2);
        assert_eq!(phases[1].avg_minutes_per_day, 62.5);
        assert_eq!(phases[0].percent_range, "50%-67%");
        assert_eq!(phases[2].emoji, "🔥");
    }

    #[test]
    fn rounding_jitter_does_not_split_a_flat_plan() {
        // 50 minutes over 30 days: whole minutes alternate between 1 and 2
        let items: Vec<_> = (1..31)
            .map(|d| item(d, 1 + d % 2, if d % 2 == 0 { 60 } else { 120 }, false))
            .collect();
        let flat = vec![50.0 / 30.0; items.len()];
        let phases = classify(&items, &flat, 50.0 / 30.0, &PlannerSettings::default());
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].band, PhaseBand::Steady);
        assert_eq!(phases[0].active_days, 30);
    }

    #[test]
    fn zero_mean_is_steady() {
        let items: Vec<_> = (19..22).map(|d| item(d, 0, 0, false)).collect();
        let phases = classify(&items, &shares(&items), 0.0, &PlannerSettings::default());
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].band, PhaseBand::Steady);
        assert_eq!(phases[0].avg_minutes_per_day, 0.0);
    }

    #[test]
    fn no_active_days_no_phases() {
        let items: Vec<_> = (19..22).map(|d| item(d, 0, 0, true)).collect();
        assert!(classify(&items, &[], 0.0, &PlannerSettings::default()).is_empty());
    }
}
