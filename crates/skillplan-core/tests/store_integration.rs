//! Integration tests for the skill store feeding the planner.

use chrono::NaiveDate;
use skillplan_core::storage::migrations::{get_schema_version, SCHEMA_VERSION};
use skillplan_core::{
    calculate_daily_plan_on, calculate_daily_requirement_on, Config, CoreError, DistributionType,
    GoalType, NewSkill, PlanCache, Progress, SkillSnapshot, SkillStore,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("skillplan.db");

    let id = {
        let store = SkillStore::open_at(&path).unwrap();
        let skill = store
            .create(NewSkill {
                name: "Spanish".into(),
                state: SkillSnapshot::pomodoro_goal(40).with_deadline(date(2026, 11, 30)),
            })
            .unwrap();
        store.record_progress(&skill.id, Progress::Pomodoros(4)).unwrap();
        skill.id
    };

    let store = SkillStore::open_at(&path).unwrap();
    let skill = store.get(&id).unwrap().unwrap();
    assert_eq!(skill.state.pomodoros_completed, 4);
    assert_eq!(skill.state.current_minutes, 100);
    assert_eq!(get_schema_version(&rusqlite_conn(&path)), SCHEMA_VERSION);
}

fn rusqlite_conn(path: &std::path::Path) -> rusqlite::Connection {
    rusqlite::Connection::open(path).unwrap()
}

#[test]
fn test_logged_progress_reduces_requirement() {
    let store = SkillStore::open_memory().unwrap();
    let today = date(2026, 10, 17);
    let skill = store
        .create(NewSkill {
            name: "Guitar".into(),
            state: SkillSnapshot::time_goal(1000).with_deadline(date(2026, 10, 27)),
        })
        .unwrap();

    let before = calculate_daily_requirement_on(&skill.snapshot(), today).unwrap();
    assert_eq!(before.units_per_day, 100);

    let skill = store.record_progress(&skill.id, Progress::Minutes(400)).unwrap();
    let after = calculate_daily_requirement_on(&skill.snapshot(), today).unwrap();
    assert_eq!(after.units_per_day, 60);
    assert_eq!(after.hours_per_day, 1.0);
}

#[test]
fn test_switching_goal_type_keeps_both_counters() {
    let store = SkillStore::open_memory().unwrap();
    let skill = store
        .create(NewSkill {
            name: "Math".into(),
            state: SkillSnapshot::time_goal(500).with_deadline(date(2026, 10, 22)),
        })
        .unwrap();
    store.record_progress(&skill.id, Progress::Pomodoros(2)).unwrap();

    let mut skill = store.get(&skill.id).unwrap().unwrap();
    skill.state.goal_type = GoalType::Pomodoros;
    skill.state.goal_pomodoros = 12;
    let skill = store.update(&skill).unwrap();

    let plan = calculate_daily_plan_on(&skill.snapshot(), date(2026, 10, 17)).unwrap();
    assert_eq!(plan.total_remaining_minutes, 250);
    assert_eq!(skill.state.current_minutes, 50);
}

#[test]
fn test_config_defaults_flow_into_new_skills() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    let mut config = Config::load_from(&config_path).unwrap();
    config.set("defaults.distribution", "exponential").unwrap();
    config.set("defaults.exponential_intensity", "0.8").unwrap();
    config.set("defaults.excluded_weekdays", "sun").unwrap();
    config.save_to(&config_path).unwrap();

    let config = Config::load_from(&config_path).unwrap();
    let store = SkillStore::open_memory().unwrap();
    let skill = store
        .create(NewSkill {
            name: "Drums".into(),
            state: config.defaults.snapshot(900).with_deadline(date(2026, 11, 10)),
        })
        .unwrap();

    assert_eq!(skill.state.distribution, DistributionType::Exponential);
    let mut cache = PlanCache::new(skillplan_core::DailyPlanner::new(config.planner_settings()));
    let plan = cache.get_or_compute(&skill.snapshot(), date(2026, 10, 17)).unwrap();
    assert!(plan.items.iter().filter(|i| i.day_of_week == 0).all(|i| i.is_excluded));
    assert_eq!(plan.scheduled_minutes(), 900);
}

#[test]
fn test_unknown_skill_errors() {
    let store = SkillStore::open_memory().unwrap();
    assert!(store.get("nope").unwrap().is_none());
    assert!(matches!(
        store.resolve("nope"),
        Err(CoreError::NotFound { .. })
    ));
}
