//! Timer agent: current time, simulated timers and countdowns

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{Local, TimeDelta};
use regex::Regex;
use url::Url;

use crate::{
    protocol::{AgentCard, AgentSkill, HandlerError, Task},
    server::{read_query, SkillHandler},
};

use super::demo_card;

static DURATION_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(m(?:in(?:ute)?s?)?|s(?:ec(?:ond)?s?)?|h(?:(?:ou)?rs?)?)").unwrap()
});

const INVALID_COMMAND: &str =
    "Invalid command. Available commands: 'time', 'timer [duration]', 'countdown [seconds]'.";

pub fn current_time() -> String {
    format!("Current time: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))
}

/// Total seconds in a duration like `5m`, `1h 30m` or `90 seconds`
///
/// `None` when no part is recognized or the total overflows.
pub fn parse_duration(input: &str) -> Option<u64> {
    let mut total: u64 = 0;
    let mut matched = false;

    for caps in DURATION_PART.captures_iter(input) {
        matched = true;
        let value: u64 = caps[1].parse().ok()?;
        let unit = caps[2].to_ascii_lowercase();
        let scale = if unit.starts_with('h') {
            3600
        } else if unit.starts_with('m') {
            60
        } else {
            1
        };
        total = total.checked_add(value.checked_mul(scale)?)?;
    }

    matched.then_some(total)
}

/// Human readable duration, e.g. `1 hour and 30 minutes`
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let plural = |n: u64, unit: &str| format!("{} {}{}", n, unit, if n > 1 { "s" } else { "" });

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(plural(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(plural(minutes, "minute"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(plural(seconds, "second"));
    }
    parts.join(" and ")
}

/// Simulate setting a timer; reports when it would end
pub fn set_timer(duration: &str) -> String {
    let Some(total) = parse_duration(duration) else {
        return "Invalid duration format. Please use a format like '5m', '30s', or '1h'.".to_string();
    };
    if total == 0 {
        return "Duration must be greater than zero.".to_string();
    }

    let end = i64::try_from(total)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| Local::now().checked_add_signed(delta));

    match end {
        Some(end) => format!(
            "Timer set for {}. It would end at {}.",
            format_duration(total),
            end.format("%H:%M:%S")
        ),
        None => "Duration is too long.".to_string(),
    }
}

/// Simulated countdown from 1 to 60 seconds
pub fn countdown(seconds: &str) -> String {
    match seconds.parse::<i64>() {
        Ok(n) if (1..=60).contains(&n) => {
            let steps: Vec<String> = (1..=n).rev().map(|i| i.to_string()).collect();
            format!("Countdown from {}: {}, 0!", n, steps.join(", "))
        }
        Ok(_) => "Please provide a positive number of seconds (max 60).".to_string(),
        Err(_) => "Invalid number of seconds. Please provide a number.".to_string(),
    }
}

pub fn respond(query: &str) -> String {
    let query = query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    match query.as_str() {
        "time" | "what time is it" | "now" => current_time(),
        q => {
            if let Some(duration) = q
                .strip_prefix("set timer ")
                .or_else(|| q.strip_prefix("timer "))
            {
                set_timer(duration)
            } else if let Some(seconds) = q.strip_prefix("countdown ") {
                countdown(seconds)
            } else {
                INVALID_COMMAND.to_string()
            }
        }
    }
}

pub fn card(url: &Url) -> AgentCard {
    demo_card(
        "Timer Agent",
        "A simple agent that provides timer functionality",
        url,
    )
    .with_skill(AgentSkill::new("time-now", "Current Time").with_description("Returns the current time"))
    .with_skill(
        AgentSkill::new("set-timer", "Set Timer")
            .with_description("Sets a timer for a specified duration (simulated)"),
    )
    .with_skill(
        AgentSkill::new("countdown", "Countdown")
            .with_description("Shows a countdown for a specified number of seconds (simulated)"),
    )
}

pub struct Timer;

#[async_trait]
impl SkillHandler for Timer {
    async fn handle(&self, task: Task) -> Result<Task, HandlerError> {
        let query = read_query(&task)?;
        Ok(task.complete(respond(&query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5m"), Some(300));
        assert_eq!(parse_duration("1h 30m"), Some(5400));
        assert_eq!(parse_duration("2 hours 15 seconds"), Some(7215));
        assert_eq!(parse_duration("90 SEC"), Some(90));
        assert_eq!(parse_duration("soon"), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0 seconds");
        assert_eq!(format_duration(1), "1 second");
        assert_eq!(format_duration(300), "5 minutes");
        assert_eq!(format_duration(3661), "1 hour and 1 minute and 1 second");
    }

    #[test]
    fn test_timer_commands() {
        assert!(respond("timer 5m").starts_with("Timer set for 5 minutes. It would end at "));
        assert!(respond("Set  Timer 1h").starts_with("Timer set for 1 hour."));
        assert_eq!(respond("timer 0s"), "Duration must be greater than zero.");
        assert!(respond("timer later").starts_with("Invalid duration format."));
    }

    #[test]
    fn test_countdown() {
        assert_eq!(respond("countdown 3"), "Countdown from 3: 3, 2, 1, 0!");
        assert_eq!(
            respond("countdown 61"),
            "Please provide a positive number of seconds (max 60)."
        );
        assert_eq!(
            respond("countdown x"),
            "Invalid number of seconds. Please provide a number."
        );
    }

    #[test]
    fn test_time_and_invalid() {
        assert!(respond("What time is it").starts_with("Current time: "));
        assert!(respond("now").starts_with("Current time: "));
        assert_eq!(respond("alarm"), INVALID_COMMAND);
    }
}
