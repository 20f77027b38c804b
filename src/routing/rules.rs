//! Ordered classification rules for free-text requests

use std::sync::LazyLock;

use regex::Regex;

use super::{AgentKind, Route};

static CALC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(calculate|calc)\s*:").unwrap());
static ARITHMETIC_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s+\-*/()]+$").unwrap());
static TRANSLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*translate\s+[a-z]{2}-[a-z]{2}\s*:").unwrap());
static TIMER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(what\s+time\s+is\s+it|time|now|(set\s+)?timer\s+.*|countdown\s+\d+)$")
        .unwrap()
});

/// Map free text to a target agent and the payload to send it
///
/// Rules are tried in order and the first match wins: calculator,
/// translator, weather, timer. Text matching none of them yields a route
/// without a target. `help` is not a rule; callers check for it first.
pub fn classify(text: &str) -> Route {
    let trimmed = text.trim();

    if let Some(prefix) = CALC_PREFIX.find(text) {
        return Route::to(AgentKind::Calculator, text[prefix.end()..].trim());
    }
    if ARITHMETIC_ONLY.is_match(trimmed) {
        return Route::to(AgentKind::Calculator, trimmed);
    }

    if TRANSLATE.is_match(text) {
        return Route::to(AgentKind::Translator, text);
    }

    let lowered = trimmed.to_lowercase();
    if lowered.starts_with("weather ") || lowered == "list-cities" {
        return Route::to(AgentKind::Weather, trimmed);
    }

    if TIMER.is_match(trimmed) {
        return Route::to(AgentKind::Timer, trimmed);
    }

    Route::unmatched(trimmed)
}
