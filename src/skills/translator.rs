//! Translator agent backed by a small phrase table

use async_trait::async_trait;
use url::Url;

use crate::{
    protocol::{AgentCard, AgentSkill, HandlerError, Task},
    server::{read_query, SkillHandler},
};

use super::demo_card;

const EXPECTED_FORMAT: &str = "Expected format: 'translate [source]-[target]: [text]'";

const EN_ES: &[(&str, &str)] = &[
    ("hello", "hola"),
    ("goodbye", "adiós"),
    ("thank you", "gracias"),
    ("please", "por favor"),
    ("yes", "sí"),
    ("no", "no"),
    ("how are you", "cómo estás"),
    ("good morning", "buenos días"),
    ("good afternoon", "buenas tardes"),
    ("good night", "buenas noches"),
];

const EN_FR: &[(&str, &str)] = &[
    ("hello", "bonjour"),
    ("goodbye", "au revoir"),
    ("thank you", "merci"),
    ("please", "s'il vous plaît"),
    ("yes", "oui"),
    ("no", "non"),
    ("how are you", "comment allez-vous"),
    ("good morning", "bonjour"),
    ("good afternoon", "bon après-midi"),
    ("good night", "bonne nuit"),
];

fn phrase_table(pair: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match pair {
        "en-es" => Some(EN_ES),
        "en-fr" => Some(EN_FR),
        _ => None,
    }
}

/// Translate one phrase between two language codes
pub fn translate(text: &str, source: &str, target: &str) -> String {
    let pair = format!("{}-{}", source, target);
    let Some(table) = phrase_table(&pair) else {
        return format!("Translation for {} is not supported", pair);
    };

    let lowered = text.to_lowercase();
    table
        .iter()
        .find(|(phrase, _)| *phrase == lowered)
        .map(|(_, translation)| translation.to_string())
        .unwrap_or_else(|| format!("No translation available for '{}'", text))
}

/// Answer text for `translate <src>-<dst>: <text>`
pub fn respond(query: &str) -> String {
    match parse_command(query) {
        Ok((source, target, text)) => translate(text, &source, &target),
        Err(reason) => format!("Error: {}\n{}", reason, EXPECTED_FORMAT),
    }
}

fn parse_command(query: &str) -> Result<(String, String, &str), String> {
    let (command, text) = query
        .split_once(':')
        .ok_or_else(|| "Invalid format. Expected 'translate [source]-[target]: [text]'".to_string())?;

    let command = command.trim();
    let pair = match command.get(..9) {
        Some(keyword) if keyword.eq_ignore_ascii_case("translate") => command[9..].trim(),
        _ => command,
    };

    let (source, target) = pair
        .split_once('-')
        .filter(|(s, t)| !s.is_empty() && !t.is_empty() && !t.contains('-'))
        .ok_or_else(|| format!("Invalid language pair '{}'", pair))?;

    Ok((source.to_lowercase(), target.to_lowercase(), text.trim()))
}

pub fn card(url: &Url) -> AgentCard {
    demo_card(
        "Translator Agent",
        "A simple translator agent that can translate between languages",
        url,
    )
    .with_skill(
        AgentSkill::new("translate-en-es", "English to Spanish")
            .with_description("Translates English to Spanish"),
    )
    .with_skill(
        AgentSkill::new("translate-en-fr", "English to French")
            .with_description("Translates English to French"),
    )
}

pub struct Translator;

#[async_trait]
impl SkillHandler for Translator {
    async fn handle(&self, task: Task) -> Result<Task, HandlerError> {
        let query = read_query(&task)?;
        Ok(task.complete(respond(&query)))
    }
}
