//! Day-by-day distribution of remaining work.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::phase::{self, Phase};
use super::requirement::remaining_days;
use super::{curve, PlannerSettings};
use crate::skill::{
    weekday_index, DistributionType, GoalType, SkillSnapshot, POMODORO_MINUTES, WEEKDAY_NAMES,
};

/// Allocation for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlanItem {
    pub date: NaiveDate,
    /// Day of week (0-6, Sunday=0)
    pub day_of_week: u8,
    pub day_of_week_name: String,
    pub minutes: u32,
    /// `minutes` in 25-minute sessions, for display
    pub pomodoros: f64,
    pub is_excluded: bool,
    /// Allocation relative to the plan's mean, rounded percent
    pub percent_of_average: u32,
}

impl DailyPlanItem {
    pub fn new(date: NaiveDate, is_excluded: bool) -> Self {
        let day_of_week = weekday_index(date);
        Self {
            date,
            day_of_week,
            day_of_week_name: WEEKDAY_NAMES[day_of_week as usize].to_string(),
            minutes: 0,
            pomodoros: 0.0,
            is_excluded,
            percent_of_average: 0,
        }
    }

    pub(crate) fn set_minutes(&mut self, minutes: u32, percent_of_average: u32) {
        self.minutes = minutes;
        self.pomodoros = f64::from(minutes) / f64::from(POMODORO_MINUTES);
        self.percent_of_average = percent_of_average;
    }
}

/// Full calendar breakdown from today to the deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub today: NaiveDate,
    pub deadline: NaiveDate,
    pub goal_type: GoalType,
    pub distribution: DistributionType,
    /// Intensity actually applied (0 for linear plans)
    pub intensity: f64,
    pub remaining_days: u32,
    pub total_days: usize,
    pub active_days: usize,
    pub total_remaining_minutes: u32,
    /// Work that could not be placed because no day is active
    pub unscheduled_minutes: u32,
    pub avg_minutes_per_day: f64,
    pub is_expired: bool,
    pub items: Vec<DailyPlanItem>,
    pub phases: Vec<Phase>,
}

impl DailyPlan {
    fn expired(skill: &SkillSnapshot, today: NaiveDate, deadline: NaiveDate, intensity: f64) -> Self {
        Self {
            today,
            deadline,
            goal_type: skill.goal_type,
            distribution: skill.distribution,
            intensity,
            remaining_days: 0,
            total_days: 0,
            active_days: 0,
            total_remaining_minutes: skill.remaining_minutes(),
            unscheduled_minutes: 0,
            avg_minutes_per_day: 0.0,
            is_expired: true,
            items: Vec::new(),
            phases: Vec::new(),
        }
    }

    /// Non-excluded days in date order.
    pub fn active_items(&self) -> impl Iterator<Item = &DailyPlanItem> {
        self.items.iter().filter(|i| !i.is_excluded)
    }

    pub fn item_on(&self, date: NaiveDate) -> Option<&DailyPlanItem> {
        self.items.iter().find(|i| i.date == date)
    }

    /// 0-based index of `date` among active days.
    pub fn active_index_of(&self, date: NaiveDate) -> Option<usize> {
        self.active_items().position(|i| i.date == date)
    }

    /// Phase covering `date`. Excluded days belong to no phase.
    pub fn phase_on(&self, date: NaiveDate) -> Option<&Phase> {
        let idx = self.items.iter().position(|i| i.date == date)?;
        if self.items[idx].is_excluded {
            return None;
        }
        self.phases.iter().find(|p| p.contains_position(idx + 1))
    }

    /// Sum of all allocations.
    pub fn scheduled_minutes(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.minutes)).sum()
    }

    /// At least one day can take work.
    pub fn has_capacity(&self) -> bool {
        self.active_days > 0
    }

    pub fn avg_pomodoros_per_day(&self) -> f64 {
        self.avg_minutes_per_day / f64::from(POMODORO_MINUTES)
    }
}

/// Daily distribution planner with configurable tuning.
#[derive(Debug, Clone, Default)]
pub struct DailyPlanner {
    settings: PlannerSettings,
}

impl DailyPlanner {
    pub fn new(settings: PlannerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Plan as of the local calendar date.
    pub fn plan(&self, skill: &SkillSnapshot) -> Option<DailyPlan> {
        self.plan_on(skill, Local::now().date_naive())
    }

    /// Plan every day from `today` to the deadline inclusive.
    ///
    /// Returns `None` without a deadline and an expired plan when the
    /// deadline is not after `today`.
    pub fn plan_on(&self, skill: &SkillSnapshot, today: NaiveDate) -> Option<DailyPlan> {
        let deadline = skill.deadline?;
        let intensity = match skill.distribution {
            DistributionType::Linear => 0.0,
            DistributionType::Exponential => skill.clamped_intensity(),
        };

        let days = remaining_days(today, deadline);
        if days <= 0 {
            tracing::debug!(%deadline, %today, "deadline passed, plan expired");
            return Some(DailyPlan::expired(skill, today, deadline, intensity));
        }

        let excluded = skill.excluded_weekdays;
        let mut items: Vec<DailyPlanItem> = today
            .iter_days()
            .take_while(|date| *date <= deadline)
            .map(|date| DailyPlanItem::new(date, excluded.contains_date(date)))
            .collect();

        let total = skill.remaining_minutes();
        let active_days = items.iter().filter(|i| !i.is_excluded).count();

        let mut plan = DailyPlan {
            today,
            deadline,
            goal_type: skill.goal_type,
            distribution: skill.distribution,
            intensity,
            remaining_days: u32::try_from(days).unwrap_or(u32::MAX),
            total_days: items.len(),
            active_days,
            total_remaining_minutes: total,
            unscheduled_minutes: 0,
            avg_minutes_per_day: 0.0,
            is_expired: false,
            items: Vec::new(),
            phases: Vec::new(),
        };

        if active_days == 0 {
            tracing::warn!(
                %deadline,
                excluded = %excluded,
                total,
                "every day until the deadline is excluded; nothing can be scheduled"
            );
            plan.unscheduled_minutes = total;
            plan.items = items;
            return Some(plan);
        }

        let mean = f64::from(total) / active_days as f64;
        let weights = curve::weights(active_days, intensity, self.settings.max_steepness);
        let shares = curve::ideal_shares(total, &weights);
        let allocation = curve::whole_minutes(total, &shares);

        for (item, minutes) in items.iter_mut().filter(|i| !i.is_excluded).zip(allocation) {
            let percent = if mean > 0.0 {
                (f64::from(minutes) / mean * 100.0).round() as u32
            } else {
                0
            };
            item.set_minutes(minutes, percent);
        }

        plan.avg_minutes_per_day = mean;
        plan.phases = phase::classify(&items, &shares, mean, &self.settings);
        plan.items = items;

        tracing::debug!(
            total,
            active_days,
            total_days = plan.total_days,
            distribution = %skill.distribution,
            intensity,
            phases = plan.phases.len(),
            "computed daily plan"
        );

        Some(plan)
    }
}

/// Daily plan as of the local calendar date, with default tuning.
pub fn calculate_daily_plan(skill: &SkillSnapshot) -> Option<DailyPlan> {
    DailyPlanner::default().plan(skill)
}

/// Daily plan as of `today`, with default tuning.
pub fn calculate_daily_plan_on(skill: &SkillSnapshot, today: NaiveDate) -> Option<DailyPlan> {
    DailyPlanner::default().plan_on(skill, today)
}
