//! Skill model.
//!
//! A [`SkillSnapshot`] is the explicit input of every planner function; the
//! store snapshots a stored [`crate::storage::Skill`] into one before calling
//! the planner.

mod snapshot;
mod weekdays;

pub use snapshot::{DistributionType, GoalType, SkillSnapshot, POMODORO_MINUTES};
pub use weekdays::{parse_weekday, weekday_index, WeekdaySet, WEEKDAY_NAMES};
