//! TOML-based application configuration.
//!
//! Stores:
//! - Planner tuning (curve steepness, phase band thresholds)
//! - Defaults applied to newly created skills
//!
//! Configuration is stored at `~/.config/skillplan/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::planner::{PlannerSettings, MAX_STEEPNESS};
use crate::skill::{DistributionType, GoalType, SkillSnapshot, WeekdaySet};

/// Settings copied into every new skill unless overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefaults {
    #[serde(default)]
    pub goal_type: GoalType,
    #[serde(default)]
    pub distribution: DistributionType,
    #[serde(default = "default_intensity")]
    pub exponential_intensity: f64,
    #[serde(default)]
    pub excluded_weekdays: WeekdaySet,
}

fn default_intensity() -> f64 {
    0.5
}

impl Default for SkillDefaults {
    fn default() -> Self {
        Self {
            goal_type: GoalType::Time,
            distribution: DistributionType::Linear,
            exponential_intensity: default_intensity(),
            excluded_weekdays: WeekdaySet::new(),
        }
    }
}

impl SkillDefaults {
    /// Snapshot with these defaults and a goal of `goal` in the default unit.
    pub fn snapshot(&self, goal: u32) -> SkillSnapshot {
        let base = match self.goal_type {
            GoalType::Time => SkillSnapshot::time_goal(goal),
            GoalType::Pomodoros => SkillSnapshot::pomodoro_goal(goal),
        };
        base.with_distribution(self.distribution, self.exponential_intensity)
            .with_excluded_weekdays(self.excluded_weekdays)
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/skillplan/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerSettings,
    #[serde(default)]
    pub defaults: SkillDefaults,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".into(),
        };
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Array(_) => {
                    // Weekday lists accept "sat,sun" as well as JSON
                    if let Ok(set) = value.parse::<WeekdaySet>() {
                        serde_json::to_value(set).map_err(|e| invalid(e.to_string()))?
                    } else {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                }
                serde_json::Value::Object(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "writing default configuration");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid. `self` is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let steepness = self.planner.max_steepness;
        if !(0.0..=MAX_STEEPNESS).contains(&steepness) {
            return Err(ConfigError::InvalidValue {
                key: "planner.max_steepness".into(),
                message: format!("must be within 0..={MAX_STEEPNESS}, got {steepness}"),
            });
        }
        if self.planner.light_below_percent > self.planner.peak_above_percent {
            return Err(ConfigError::InvalidValue {
                key: "planner.light_below_percent".into(),
                message: format!(
                    "must not exceed planner.peak_above_percent ({})",
                    self.planner.peak_above_percent
                ),
            });
        }
        let intensity = self.defaults.exponential_intensity;
        if !(0.0..=1.0).contains(&intensity) {
            return Err(ConfigError::InvalidValue {
                key: "defaults.exponential_intensity".into(),
                message: format!("must be within 0..=1, got {intensity}"),
            });
        }
        Ok(())
    }

    pub fn planner_settings(&self) -> PlannerSettings {
        self.planner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.planner.max_steepness, 3.0);
        assert_eq!(parsed.defaults.exponential_intensity, 0.5);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[planner]\npeak_above_percent = 130\n").unwrap();
        assert_eq!(cfg.planner.peak_above_percent, 130);
        assert_eq!(cfg.planner.light_below_percent, 85);
        assert_eq!(cfg.defaults, SkillDefaults::default());
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("planner.light_below_percent").as_deref(), Some("85"));
        assert_eq!(cfg.get("defaults.distribution").as_deref(), Some("linear"));
        assert!(cfg.get("planner.nope").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_numbers_enums_and_weekdays() {
        let mut cfg = Config::default();
        cfg.set("planner.max_steepness", "2.5").unwrap();
        cfg.set("defaults.distribution", "exponential").unwrap();
        cfg.set("defaults.excluded_weekdays", "sat,sun").unwrap();

        assert_eq!(cfg.planner.max_steepness, 2.5);
        assert_eq!(cfg.defaults.distribution, DistributionType::Exponential);
        assert_eq!(cfg.defaults.excluded_weekdays.len(), 2);
        assert_eq!(cfg.get("defaults.excluded_weekdays").as_deref(), Some("[0,6]"));
    }

    #[test]
    fn set_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(cfg.set("planner.unknown", "1").is_err());
        assert!(cfg.set("defaults.distribution", "quadratic").is_err());
        assert!(cfg.set("defaults.exponential_intensity", "3").is_err());
        assert!(cfg.set("planner.light_below_percent", "500").is_err());
        assert!(cfg.set("planner.max_steepness", "-1").is_err());
        assert!(cfg.set("planner.max_steepness", "700").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn defaults_build_snapshot() {
        let defaults = SkillDefaults {
            goal_type: GoalType::Pomodoros,
            distribution: DistributionType::Exponential,
            exponential_intensity: 0.3,
            excluded_weekdays: "sun".parse().unwrap(),
        };
        let snapshot = defaults.snapshot(40);
        assert_eq!(snapshot.goal_pomodoros, 40);
        assert_eq!(snapshot.goal_type, GoalType::Pomodoros);
        assert_eq!(snapshot.exponential_intensity, 0.3);
        assert!(snapshot.excluded_weekdays.contains(0));
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg, Config::default());

        let mut changed = cfg.clone();
        changed.set("planner.peak_above_percent", "140").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().planner.peak_above_percent, 140);
    }

    #[test]
    fn load_from_rejects_overflowing_steepness() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[planner]\nmax_steepness = 800.0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(crate::error::CoreError::Config(ConfigError::InvalidValue { .. }))
        ));

        let mut cfg = Config::default();
        cfg.set("planner.max_steepness", "50").unwrap();
        assert_eq!(cfg.planner.max_steepness, MAX_STEEPNESS);
    }

    #[test]
    fn load_from_rejects_broken_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "planner = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
