//! Single-number daily requirement.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::skill::{GoalType, SkillSnapshot, POMODORO_MINUTES};

/// Aggregate "units per day" needed to hit the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPrediction {
    pub remaining_days: u32,
    /// Daily requirement in the goal's own unit (minutes or pomodoros)
    pub units_per_day: u32,
    pub pomodoros_per_day: u32,
    pub hours_per_day: f64,
    pub is_expired: bool,
    pub goal_type: GoalType,
}

impl DailyPrediction {
    fn expired(goal_type: GoalType) -> Self {
        Self {
            remaining_days: 0,
            units_per_day: 0,
            pomodoros_per_day: 0,
            hours_per_day: 0.0,
            is_expired: true,
            goal_type,
        }
    }

    fn goal_met(remaining_days: u32, goal_type: GoalType) -> Self {
        Self {
            remaining_days,
            units_per_day: 0,
            pomodoros_per_day: 0,
            hours_per_day: 0.0,
            is_expired: false,
            goal_type,
        }
    }

    /// Daily requirement expressed in minutes.
    pub fn minutes_per_day(&self) -> u32 {
        match self.goal_type {
            GoalType::Time => self.units_per_day,
            GoalType::Pomodoros => self.units_per_day.saturating_mul(POMODORO_MINUTES),
        }
    }
}

/// Whole days between two calendar dates. Negative when the deadline has passed.
pub fn remaining_days(today: NaiveDate, deadline: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Daily requirement as of the local calendar date.
pub fn calculate_daily_requirement(skill: &SkillSnapshot) -> Option<DailyPrediction> {
    calculate_daily_requirement_on(skill, Local::now().date_naive())
}

/// Daily requirement as of `today`.
///
/// Returns `None` when the skill has no deadline. A deadline on or before
/// `today` is reported as expired regardless of progress.
pub fn calculate_daily_requirement_on(
    skill: &SkillSnapshot,
    today: NaiveDate,
) -> Option<DailyPrediction> {
    let deadline = skill.deadline?;
    let goal_type = skill.goal_type;

    let days = remaining_days(today, deadline);
    if days <= 0 {
        tracing::debug!(%deadline, %today, "deadline passed, requirement expired");
        return Some(DailyPrediction::expired(goal_type));
    }
    let remaining_days = u32::try_from(days).unwrap_or(u32::MAX);

    let remaining_units = skill.remaining_units();
    if remaining_units == 0 {
        return Some(DailyPrediction::goal_met(remaining_days, goal_type));
    }

    // Ceiling so the user never falls short of the deadline.
    let units_per_day = (f64::from(remaining_units) / f64::from(remaining_days)).ceil() as u32;

    let (pomodoros_per_day, hours_per_day) = match goal_type {
        GoalType::Pomodoros => (
            units_per_day,
            f64::from(units_per_day) * f64::from(POMODORO_MINUTES) / 60.0,
        ),
        GoalType::Time => (
            (f64::from(units_per_day) / f64::from(POMODORO_MINUTES)).ceil() as u32,
            f64::from(units_per_day) / 60.0,
        ),
    };

    tracing::debug!(
        remaining_units,
        remaining_days,
        units_per_day,
        goal_type = %goal_type,
        "computed daily requirement"
    );

    Some(DailyPrediction {
        remaining_days,
        units_per_day,
        pomodoros_per_day,
        hours_per_day,
        is_expired: false,
        goal_type,
    })
}
