//! Skill snapshot: the planner's sole input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::WeekdaySet;
use crate::error::ValidationError;

/// Length of one pomodoro session in minutes.
pub const POMODORO_MINUTES: u32 = 25;

/// Unit a skill goal is tracked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Raw minutes
    #[default]
    Time,
    /// Fixed 25-minute sessions
    Pomodoros,
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time => write!(f, "time"),
            Self::Pomodoros => write!(f, "pomodoros"),
        }
    }
}

impl FromStr for GoalType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "time" | "minutes" | "min" => Ok(Self::Time),
            "pomodoros" | "pomodoro" | "pomo" => Ok(Self::Pomodoros),
            other => Err(ValidationError::InvalidValue {
                field: "goal_type".into(),
                message: format!("unknown goal type '{other}' (expected time or pomodoros)"),
            }),
        }
    }
}

/// How remaining work is spread over active days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionType {
    /// Even split
    #[default]
    Linear,
    /// Intensity-curved split, ramping up toward the deadline
    Exponential,
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Exponential => write!(f, "exponential"),
        }
    }
}

impl FromStr for DistributionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "exponential" | "exp" => Ok(Self::Exponential),
            other => Err(ValidationError::InvalidValue {
                field: "distribution".into(),
                message: format!("unknown distribution '{other}' (expected linear or exponential)"),
            }),
        }
    }
}

/// Point-in-time view of a skill's goal, progress and planning settings.
///
/// Both counter pairs are kept so switching the goal type does not lose
/// progress; the active pair is chosen by `goal_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSnapshot {
    pub goal_type: GoalType,
    #[serde(default)]
    pub goal_minutes: u32,
    #[serde(default)]
    pub current_minutes: u32,
    #[serde(default)]
    pub goal_pomodoros: u32,
    #[serde(default)]
    pub pomodoros_completed: u32,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub distribution: DistributionType,
    /// Curve steepness in [0, 1], used only by exponential distribution
    #[serde(default)]
    pub exponential_intensity: f64,
    #[serde(default)]
    pub excluded_weekdays: WeekdaySet,
}

impl Default for SkillSnapshot {
    fn default() -> Self {
        Self {
            goal_type: GoalType::Time,
            goal_minutes: 0,
            current_minutes: 0,
            goal_pomodoros: 0,
            pomodoros_completed: 0,
            deadline: None,
            distribution: DistributionType::Linear,
            exponential_intensity: 0.0,
            excluded_weekdays: WeekdaySet::new(),
        }
    }
}

impl SkillSnapshot {
    /// Time-based goal of `goal_minutes`.
    pub fn time_goal(goal_minutes: u32) -> Self {
        Self {
            goal_type: GoalType::Time,
            goal_minutes,
            ..Self::default()
        }
    }

    /// Session-based goal of `goal_pomodoros`.
    pub fn pomodoro_goal(goal_pomodoros: u32) -> Self {
        Self {
            goal_type: GoalType::Pomodoros,
            goal_pomodoros,
            ..Self::default()
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_current_minutes(mut self, minutes: u32) -> Self {
        self.current_minutes = minutes;
        self
    }

    pub fn with_pomodoros_completed(mut self, pomodoros: u32) -> Self {
        self.pomodoros_completed = pomodoros;
        self
    }

    pub fn with_distribution(mut self, distribution: DistributionType, intensity: f64) -> Self {
        self.distribution = distribution;
        self.exponential_intensity = intensity;
        self
    }

    pub fn with_excluded_weekdays(mut self, excluded: WeekdaySet) -> Self {
        self.excluded_weekdays = excluded;
        self
    }

    /// Target in the active goal unit.
    pub fn goal_amount(&self) -> u32 {
        match self.goal_type {
            GoalType::Time => self.goal_minutes,
            GoalType::Pomodoros => self.goal_pomodoros,
        }
    }

    /// Completed amount in the active goal unit.
    pub fn progress_amount(&self) -> u32 {
        match self.goal_type {
            GoalType::Time => self.current_minutes,
            GoalType::Pomodoros => self.pomodoros_completed,
        }
    }

    /// Work left in the active goal unit. Never negative.
    pub fn remaining_units(&self) -> u32 {
        self.goal_amount().saturating_sub(self.progress_amount())
    }

    /// Work left in minutes, converting pomodoros at 25 minutes each.
    pub fn remaining_minutes(&self) -> u32 {
        match self.goal_type {
            GoalType::Time => self.remaining_units(),
            GoalType::Pomodoros => self.remaining_units().saturating_mul(POMODORO_MINUTES),
        }
    }

    pub fn is_goal_met(&self) -> bool {
        self.remaining_units() == 0
    }

    /// Intensity as the planner uses it: clamped to [0, 1], NaN treated as 0.
    pub fn clamped_intensity(&self) -> f64 {
        if self.exponential_intensity.is_nan() {
            0.0
        } else {
            self.exponential_intensity.clamp(0.0, 1.0)
        }
    }

    /// Check settings a user can get wrong.
    ///
    /// # Errors
    /// Returns an error if the intensity is NaN or outside [0, 1].
    /// Weekday indices need no check here: [`WeekdaySet`] refuses anything above 6.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let intensity = self.exponential_intensity;
        if !intensity.is_finite() || !(0.0..=1.0).contains(&intensity) {
            return Err(ValidationError::OutOfRange {
                field: "exponential_intensity".into(),
                value: intensity,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}
