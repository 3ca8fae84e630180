//! Skill management commands.

use clap::Subcommand;

use skillplan_core::{
    Config, DistributionType, GoalType, NewSkill, Progress, SkillStore, WeekdaySet,
};

use crate::render;

#[derive(Subcommand)]
pub enum SkillAction {
    /// Create a skill
    Add {
        /// Skill name
        name: String,
        /// Goal amount (minutes or pomodoros, depending on the goal type)
        #[arg(long)]
        goal: u32,
        /// Goal unit: time or pomodoros
        #[arg(long)]
        goal_type: Option<String>,
        /// Deadline (YYYY-MM-DD or +N days)
        #[arg(long)]
        deadline: Option<String>,
        /// linear or exponential
        #[arg(long)]
        distribution: Option<String>,
        /// Exponential intensity (0.0-1.0)
        #[arg(long)]
        intensity: Option<f64>,
        /// Days off, e.g. "sat,sun"
        #[arg(long)]
        off: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List skills
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one skill
    Show {
        /// Skill id, id prefix or name
        skill: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record completed work
    Log {
        /// Skill id, id prefix or name
        skill: String,
        /// Minutes studied
        #[arg(long, conflicts_with = "pomodoros", required_unless_present = "pomodoros")]
        minutes: Option<u32>,
        /// Pomodoros completed
        #[arg(long)]
        pomodoros: Option<u32>,
    },
    /// Change skill settings
    Set {
        /// Skill id, id prefix or name
        skill: String,
        #[arg(long)]
        name: Option<String>,
        /// Goal amount in the (new) goal unit
        #[arg(long)]
        goal: Option<u32>,
        #[arg(long)]
        goal_type: Option<String>,
        /// Deadline (YYYY-MM-DD or +N days)
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<String>,
        /// Remove the deadline
        #[arg(long)]
        clear_deadline: bool,
        #[arg(long)]
        distribution: Option<String>,
        #[arg(long)]
        intensity: Option<f64>,
        /// Days off, e.g. "sat,sun" or "none"
        #[arg(long)]
        off: Option<String>,
    },
    /// Show the progress log
    History {
        /// Skill id, id prefix or name
        skill: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a skill
    Remove {
        /// Skill id, id prefix or name
        skill: String,
    },
}

pub fn run(action: SkillAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SkillStore::open()?;

    match action {
        SkillAction::Add {
            name,
            goal,
            goal_type,
            deadline,
            distribution,
            intensity,
            off,
            json,
        } => {
            let config = Config::load()?;
            let mut defaults = config.defaults.clone();
            if let Some(goal_type) = goal_type {
                defaults.goal_type = goal_type.parse::<GoalType>()?;
            }

            let mut state = defaults.snapshot(goal);
            if let Some(deadline) = deadline {
                state.deadline = Some(render::parse_deadline(&deadline)?);
            }
            if let Some(distribution) = distribution {
                state.distribution = distribution.parse::<DistributionType>()?;
            }
            if let Some(intensity) = intensity {
                state.exponential_intensity = intensity;
            }
            if let Some(off) = off {
                state.excluded_weekdays = off.parse::<WeekdaySet>()?;
            }

            let skill = store.create(NewSkill { name, state })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&skill)?);
            } else {
                println!("Skill created: {}", skill.id);
                print!("{}", render::skill_details(&skill));
            }
        }
        SkillAction::List { json } => {
            let skills = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&skills)?);
            } else if skills.is_empty() {
                println!("No skills yet. Add one with `skillplan skill add`.");
            } else {
                for skill in &skills {
                    println!("{}", render::skill_summary(skill));
                }
            }
        }
        SkillAction::Show { skill, json } => {
            let skill = store.resolve(&skill)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&skill)?);
            } else {
                print!("{}", render::skill_details(&skill));
            }
        }
        SkillAction::Log {
            skill,
            minutes,
            pomodoros,
        } => {
            let skill = store.resolve(&skill)?;
            let progress = match (minutes, pomodoros) {
                (Some(m), _) => Progress::Minutes(m),
                (None, Some(p)) => Progress::Pomodoros(p),
                (None, None) => return Err("either --minutes or --pomodoros is required".into()),
            };
            let updated = store.record_progress(&skill.id, progress)?;
            println!("Logged for {}", updated.name);
            print!("{}", render::skill_details(&updated));
        }
        SkillAction::Set {
            skill,
            name,
            goal,
            goal_type,
            deadline,
            clear_deadline,
            distribution,
            intensity,
            off,
        } => {
            let mut skill = store.resolve(&skill)?;
            if let Some(name) = name {
                skill.name = name;
            }
            if let Some(goal_type) = goal_type {
                skill.state.goal_type = goal_type.parse::<GoalType>()?;
            }
            if let Some(goal) = goal {
                match skill.state.goal_type {
                    GoalType::Time => skill.state.goal_minutes = goal,
                    GoalType::Pomodoros => skill.state.goal_pomodoros = goal,
                }
            }
            if clear_deadline {
                skill.state.deadline = None;
            } else if let Some(deadline) = deadline {
                skill.state.deadline = Some(render::parse_deadline(&deadline)?);
            }
            if let Some(distribution) = distribution {
                skill.state.distribution = distribution.parse::<DistributionType>()?;
            }
            if let Some(intensity) = intensity {
                skill.state.exponential_intensity = intensity;
            }
            if let Some(off) = off {
                skill.state.excluded_weekdays = off.parse::<WeekdaySet>()?;
            }

            let updated = store.update(&skill)?;
            println!("ok");
            print!("{}", render::skill_details(&updated));
        }
        SkillAction::History { skill, json } => {
            let skill = store.resolve(&skill)?;
            let entries = store.history(&skill.id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No progress logged for {} yet.", skill.name);
            } else {
                for entry in &entries {
                    let pomodoros = if entry.pomodoros > 0 {
                        format!(" ({} pomodoros)", entry.pomodoros)
                    } else {
                        String::new()
                    };
                    println!(
                        "{}  {}{}",
                        entry.logged_at.format("%Y-%m-%d %H:%M"),
                        render::format_minutes(entry.minutes),
                        pomodoros
                    );
                }
            }
        }
        SkillAction::Remove { skill } => {
            let skill = store.resolve(&skill)?;
            store.delete(&skill.id)?;
            println!("Removed {}", skill.name);
        }
    }

    Ok(())
}
