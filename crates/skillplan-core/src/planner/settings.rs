//! Planner tuning.

use serde::{Deserialize, Serialize};

/// Largest accepted `max_steepness`. The last day's weight is `e^50` times the first.
pub const MAX_STEEPNESS: f64 = 50.0;

/// Tunable constants of the daily planner.
///
/// Stored as the `[planner]` table of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Exponent reached on the last active day at intensity 1
    #[serde(default = "default_max_steepness")]
    pub max_steepness: f64,
    /// Days below this percent of the average are "Warm-up"
    #[serde(default = "default_light_below_percent")]
    pub light_below_percent: u32,
    /// Days above this percent of the average are "Peak"
    #[serde(default = "default_peak_above_percent")]
    pub peak_above_percent: u32,
}

fn default_max_steepness() -> f64 {
    3.0
}
fn default_light_below_percent() -> u32 {
    85
}
fn default_peak_above_percent() -> u32 {
    115
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            max_steepness: default_max_steepness(),
            light_below_percent: default_light_below_percent(),
            peak_above_percent: default_peak_above_percent(),
        }
    }
}
