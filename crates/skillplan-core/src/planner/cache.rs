//! Memoization boundary for the daily planner.
//!
//! The planner is pure, so a plan can be reused for as long as every field
//! it reads is unchanged. [`PlanCache`] keeps the most recent input tuple and
//! recomputes only when it differs. Rate limiting of interactive callers
//! (e.g. an intensity slider) stays with the caller.

use chrono::NaiveDate;

use super::distribution::{DailyPlan, DailyPlanner};
use crate::skill::{DistributionType, GoalType, SkillSnapshot, WeekdaySet};

/// Every input the planner reads, including the date it plans from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanKey {
    today: NaiveDate,
    deadline: Option<NaiveDate>,
    goal_type: GoalType,
    goal_minutes: u32,
    current_minutes: u32,
    goal_pomodoros: u32,
    pomodoros_completed: u32,
    distribution: DistributionType,
    // f64 bit pattern, keeps the key Eq
    intensity_bits: u64,
    excluded_weekdays: WeekdaySet,
}

impl PlanKey {
    pub fn new(skill: &SkillSnapshot, today: NaiveDate) -> Self {
        Self {
            today,
            deadline: skill.deadline,
            goal_type: skill.goal_type,
            goal_minutes: skill.goal_minutes,
            current_minutes: skill.current_minutes,
            goal_pomodoros: skill.goal_pomodoros,
            pomodoros_completed: skill.pomodoros_completed,
            distribution: skill.distribution,
            intensity_bits: skill.exponential_intensity.to_bits(),
            excluded_weekdays: skill.excluded_weekdays,
        }
    }
}

/// Single-entry cache in front of a [`DailyPlanner`].
#[derive(Debug, Default)]
pub struct PlanCache {
    planner: DailyPlanner,
    entry: Option<(PlanKey, Option<DailyPlan>)>,
    hits: u64,
    misses: u64,
}

impl PlanCache {
    pub fn new(planner: DailyPlanner) -> Self {
        Self {
            planner,
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Plan for `skill` as of `today`, reusing the last result when the inputs match.
    pub fn get_or_compute(&mut self, skill: &SkillSnapshot, today: NaiveDate) -> Option<&DailyPlan> {
        let key = PlanKey::new(skill, today);
        let cached = matches!(&self.entry, Some((k, _)) if *k == key);

        if cached {
            self.hits += 1;
        } else {
            self.misses += 1;
            let plan = self.planner.plan_on(skill, today);
            self.entry = Some((key, plan));
        }

        self.entry.as_ref().and_then(|(_, plan)| plan.as_ref())
    }

    /// Drop the cached plan.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
