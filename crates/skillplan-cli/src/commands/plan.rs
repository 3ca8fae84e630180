//! Pace and daily plan commands.

use chrono::Local;
use clap::Subcommand;

use skillplan_core::{
    calculate_daily_requirement_on, Config, DailyPlanner, DistributionType, SkillStore,
    WeekdaySet,
};

use crate::render;

#[derive(Subcommand)]
pub enum PlanAction {
    /// Daily requirement to reach the goal by the deadline
    Pace {
        /// Skill id, id prefix or name
        skill: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Day-by-day schedule until the deadline
    Daily {
        /// Skill id, id prefix or name
        skill: String,
        /// Preview with another distribution (not saved)
        #[arg(long)]
        distribution: Option<String>,
        /// Preview with another intensity (not saved)
        #[arg(long)]
        intensity: Option<f64>,
        /// Preview with other days off (not saved)
        #[arg(long)]
        off: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SkillStore::open()?;
    let today = Local::now().date_naive();

    match action {
        PlanAction::Pace { skill, json } => {
            let skill = store.resolve(&skill)?;
            let prediction = calculate_daily_requirement_on(&skill.snapshot(), today);

            match (prediction, json) {
                (Some(p), true) => println!("{}", serde_json::to_string_pretty(&p)?),
                (None, true) => println!("null"),
                (Some(p), false) => println!("{}", render::prediction(&skill.name, &p)),
                (None, false) => println!(
                    "{}: no deadline set, nothing to predict. Set one with `skillplan skill set --deadline`.",
                    skill.name
                ),
            }
        }
        PlanAction::Daily {
            skill,
            distribution,
            intensity,
            off,
            json,
        } => {
            let skill = store.resolve(&skill)?;
            let mut snapshot = skill.snapshot();
            if let Some(distribution) = distribution {
                snapshot.distribution = distribution.parse::<DistributionType>()?;
            }
            if let Some(intensity) = intensity {
                snapshot.exponential_intensity = intensity;
            }
            if let Some(off) = off {
                snapshot.excluded_weekdays = off.parse::<WeekdaySet>()?;
            }
            snapshot.validate()?;

            let config = Config::load()?;
            let planner = DailyPlanner::new(config.planner_settings());
            let plan = planner.plan_on(&snapshot, today);

            match (plan, json) {
                (Some(plan), true) => println!("{}", serde_json::to_string_pretty(&plan)?),
                (None, true) => println!("null"),
                (Some(plan), false) => print!("{}", render::daily_plan(&skill.name, &plan)),
                (None, false) => println!(
                    "{}: no deadline set, nothing to plan. Set one with `skillplan skill set --deadline`.",
                    skill.name
                ),
            }
        }
    }

    Ok(())
}
