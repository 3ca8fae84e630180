mod config;
pub mod migrations;
pub mod skills;

pub use config::{Config, SkillDefaults};
pub use skills::{NewSkill, Progress, ProgressEntry, Skill, SkillStore};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the skillplan data directory.
///
/// `SKILLPLAN_HOME` overrides the location entirely. Otherwise this is
/// `~/.config/skillplan[-dev]/`, with `SKILLPLAN_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("SKILLPLAN_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("SKILLPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("skillplan-dev")
            } else {
                base_dir.join("skillplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
