//! Human-readable formatting for planner output.

use chrono::{Duration, Local, NaiveDate};

use skillplan_core::{DailyPlan, DailyPrediction, GoalType, Skill};

const BAR_WIDTH: usize = 30;

/// "Xh Ymin", "Xh" or "Ymin".
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{m}min"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}min"),
    }
}

pub fn format_hours(hours: f64) -> String {
    format_minutes((hours * 60.0).round().max(0.0) as u32)
}

/// Parse `YYYY-MM-DD`, or `+N` for N days from today.
pub fn parse_deadline(input: &str) -> Result<NaiveDate, String> {
    let trimmed = input.trim();
    if let Some(days) = trimmed.strip_prefix('+') {
        let invalid = || format!("invalid relative deadline '{trimmed}' (expected +N)");
        let days: i64 = days.parse().map_err(|_| invalid())?;
        return Duration::try_days(days)
            .and_then(|offset| Local::now().date_naive().checked_add_signed(offset))
            .ok_or_else(invalid);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| format!("invalid deadline '{trimmed}' (expected YYYY-MM-DD or +N)"))
}

pub fn skill_summary(skill: &Skill) -> String {
    let s = &skill.state;
    let (progress, goal) = match s.goal_type {
        GoalType::Time => (format_minutes(s.current_minutes), format_minutes(s.goal_minutes)),
        GoalType::Pomodoros => (
            format!("{} pomodoros", s.pomodoros_completed),
            format!("{} pomodoros", s.goal_pomodoros),
        ),
    };
    let deadline = s
        .deadline
        .map(|d| d.to_string())
        .unwrap_or_else(|| "no deadline".to_string());
    format!(
        "{}  {:<20} {} / {}  ({})",
        &skill.id[..8],
        skill.name,
        progress,
        goal,
        deadline
    )
}

pub fn skill_details(skill: &Skill) -> String {
    let s = &skill.state;
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", skill.name, skill.id));
    out.push_str(&format!("  Goal type:     {}\n", s.goal_type));
    match s.goal_type {
        GoalType::Time => out.push_str(&format!(
            "  Progress:      {} of {}\n",
            format_minutes(s.current_minutes),
            format_minutes(s.goal_minutes)
        )),
        GoalType::Pomodoros => out.push_str(&format!(
            "  Progress:      {} of {} pomodoros\n",
            s.pomodoros_completed, s.goal_pomodoros
        )),
    }
    out.push_str(&format!(
        "  Deadline:      {}\n",
        s.deadline
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".into())
    ));
    out.push_str(&format!("  Distribution:  {}", s.distribution));
    if s.distribution == skillplan_core::DistributionType::Exponential {
        out.push_str(&format!(" (intensity {:.2})", s.exponential_intensity));
    }
    out.push('\n');
    out.push_str(&format!("  Days off:      {}\n", s.excluded_weekdays));
    out
}

pub fn prediction(name: &str, p: &DailyPrediction) -> String {
    if p.is_expired {
        return format!("{name}: deadline has passed");
    }
    if p.units_per_day == 0 {
        return format!(
            "{name}: goal reached, {} days left before the deadline",
            p.remaining_days
        );
    }
    let per_day = match p.goal_type {
        GoalType::Time => format!("{}/day", format_minutes(p.units_per_day)),
        GoalType::Pomodoros => format!("{} pomodoros/day", p.pomodoros_per_day),
    };
    format!(
        "{name}: {per_day} ({} per day, ~{} pomodoros) for {} days",
        format_hours(p.hours_per_day),
        p.pomodoros_per_day,
        p.remaining_days
    )
}

/// Bar chart of a plan followed by its phases.
pub fn daily_plan(name: &str, plan: &DailyPlan) -> String {
    if plan.is_expired {
        return format!("{name}: deadline {} has passed, nothing to plan\n", plan.deadline);
    }

    let mut out = format!(
        "\n{name}: {} remaining over {} active of {} days ({}",
        format_minutes(plan.total_remaining_minutes),
        plan.active_days,
        plan.total_days,
        plan.distribution
    );
    if plan.intensity > 0.0 {
        out.push_str(&format!(", intensity {:.2}", plan.intensity));
    }
    out.push_str(")\n");
    out.push_str(&"─".repeat(60));
    out.push('\n');

    let max = plan.items.iter().map(|i| i.minutes).max().unwrap_or(0);
    for item in &plan.items {
        let label = format!("{} {}", item.date, &item.day_of_week_name[..3]);
        if item.is_excluded {
            out.push_str(&format!("{label} {:<width$} off\n", "·", width = BAR_WIDTH));
            continue;
        }
        let len = if max > 0 {
            (item.minutes as usize * BAR_WIDTH) / max as usize
        } else {
            0
        };
        out.push_str(&format!(
            "{label} {}{} {:>9} {:>4}%\n",
            "█".repeat(len),
            " ".repeat(BAR_WIDTH - len),
            format_minutes(item.minutes),
            item.percent_of_average
        ));
    }

    out.push_str(&"─".repeat(60));
    out.push('\n');

    if !plan.has_capacity() {
        out.push_str(&format!(
            "Every day until the deadline is off; {} cannot be scheduled.\n",
            format_minutes(plan.unscheduled_minutes)
        ));
        return out;
    }

    out.push_str(&format!(
        "Average: {}/day ({:.1} pomodoros)\n\nPhases:\n",
        format_minutes(plan.avg_minutes_per_day.round() as u32),
        plan.avg_pomodoros_per_day()
    ));
    for phase in &plan.phases {
        out.push_str(&format!(
            "  {} {:<8} days {:>3}-{:<3} {:>9}/day  {}\n",
            phase.emoji,
            phase.name,
            phase.start_day,
            phase.end_day,
            format_minutes(phase.avg_minutes_per_day.round() as u32),
            phase.percent_range
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes() {
        assert_eq!(format_minutes(0), "0min");
        assert_eq!(format_minutes(45), "45min");
        assert_eq!(format_minutes(60), "1h");
        assert_eq!(format_minutes(61), "1h 1min");
        assert_eq!(format_hours(1.5), "1h 30min");
    }

    #[test]
    fn parses_deadlines() {
        assert_eq!(
            parse_deadline("2026-12-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 1).unwrap()
        );
        assert_eq!(
            parse_deadline("+3").unwrap(),
            Local::now().date_naive() + Duration::days(3)
        );
        assert!(parse_deadline("next week").is_err());

        let err = parse_deadline("+99999999").unwrap_err();
        assert!(err.contains("invalid relative deadline"));
        assert!(parse_deadline(&format!("+{}", i64::MAX)).is_err());
    }
}
