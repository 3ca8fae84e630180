//! # skillplan Core Library
//!
//! Core logic for planning skill study against a deadline. The planner is a
//! set of pure functions over an explicit [`SkillSnapshot`]; storage and
//! configuration are adapters around it, and the CLI is a thin layer over
//! the same library.
//!
//! ## Architecture
//!
//! - **Planner**: daily requirement, day-by-day distribution (linear or
//!   exponential), phase classification and a memoizing [`PlanCache`]
//! - **Skill model**: goal units, distribution settings, excluded weekdays
//! - **Storage**: SQLite-based skill store and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`calculate_daily_requirement`]: single "units per day" figure
//! - [`calculate_daily_plan`]: calendar breakdown with phases
//! - [`SkillStore`]: skill and progress persistence
//! - [`Config`]: planner tuning and skill defaults

pub mod error;
pub mod planner;
pub mod skill;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use planner::{
    calculate_daily_plan, calculate_daily_plan_on, calculate_daily_requirement,
    calculate_daily_requirement_on, DailyPlan, DailyPlanItem, DailyPlanner, DailyPrediction,
    Phase, PhaseBand, PlanCache, PlannerSettings,
};
pub use skill::{DistributionType, GoalType, SkillSnapshot, WeekdaySet, POMODORO_MINUTES};
pub use storage::{Config, NewSkill, Progress, Skill, SkillStore};
