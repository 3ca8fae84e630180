//! Skill pace prediction and daily study planning.
//!
//! Two pure entry points operate on a [`SkillSnapshot`](crate::skill::SkillSnapshot):
//!
//! - [`calculate_daily_requirement`]: quick "units per day" figure with an
//!   expiry flag.
//! - [`calculate_daily_plan`]: every day from today to the deadline with its
//!   allocation, grouped into phases.
//!
//! Edge cases (no deadline, passed deadline, goal met, no active days) are
//! reported through `None` or flags on the result, never as errors. The only
//! clock read is the local date, taken once per call; the `_on` variants take
//! it as an argument instead.

mod cache;
pub mod curve;
mod distribution;
mod phase;
mod requirement;
mod settings;

pub use cache::{PlanCache, PlanKey};
pub use distribution::{
    calculate_daily_plan, calculate_daily_plan_on, DailyPlan, DailyPlanItem, DailyPlanner,
};
pub use phase::{Phase, PhaseBand};
pub use requirement::{
    calculate_daily_requirement, calculate_daily_requirement_on, remaining_days, DailyPrediction,
};
pub use settings::{PlannerSettings, MAX_STEEPNESS};
