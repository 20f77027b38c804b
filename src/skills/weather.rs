//! Weather agent serving mocked conditions for a fixed set of cities

use async_trait::async_trait;
use chrono::Local;
use url::Url;

use crate::{
    protocol::{AgentCard, AgentSkill, HandlerError, Task},
    server::{read_query, SkillHandler},
};

use super::demo_card;

struct CityWeather {
    city: &'static str,
    temp_c: i32,
    condition: &'static str,
}

const CITIES: &[CityWeather] = &[
    CityWeather { city: "new york", temp_c: 20, condition: "Partly Cloudy" },
    CityWeather { city: "london", temp_c: 14, condition: "Rainy" },
    CityWeather { city: "tokyo", temp_c: 25, condition: "Sunny" },
    CityWeather { city: "paris", temp_c: 17, condition: "Clear" },
    CityWeather { city: "sydney", temp_c: 23, condition: "Sunny" },
    CityWeather { city: "berlin", temp_c: 15, condition: "Cloudy" },
    CityWeather { city: "moscow", temp_c: 5, condition: "Snowy" },
    CityWeather { city: "dubai", temp_c: 35, condition: "Hot" },
    CityWeather { city: "mumbai", temp_c: 30, condition: "Humid" },
    CityWeather { city: "rio de janeiro", temp_c: 27, condition: "Sunny" },
];

const INVALID_COMMAND: &str = "Invalid command. Use 'weather [city]' to get weather \
or 'list-cities' to see available cities.";

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Current conditions for a city
pub fn get_weather(city: &str) -> String {
    let city = city.to_lowercase();
    match CITIES.iter().find(|c| c.city == city) {
        Some(entry) => format!(
            "Weather for {} at {}:\nTemperature: {}°C\nCondition: {}",
            title_case(entry.city),
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            entry.temp_c,
            entry.condition
        ),
        None => format!(
            "Weather data for {} is not available. Use 'list-cities' to see available cities.",
            city
        ),
    }
}

/// Alphabetical list of known cities
pub fn list_cities() -> String {
    let mut cities: Vec<String> = CITIES.iter().map(|c| title_case(c.city)).collect();
    cities.sort();
    format!("Available cities:\n{}", cities.join("\n"))
}

pub fn respond(query: &str) -> String {
    let query = query.trim().to_lowercase();
    if query == "list-cities" {
        list_cities()
    } else if let Some(city) = query.strip_prefix("weather ") {
        get_weather(city.trim())
    } else {
        INVALID_COMMAND.to_string()
    }
}

pub fn card(url: &Url) -> AgentCard {
    demo_card(
        "Weather Agent",
        "A simple agent that provides weather information for cities",
        url,
    )
    .with_skill(
        AgentSkill::new("get-weather", "Get Weather")
            .with_description("Gets the current weather for a specified city"),
    )
    .with_skill(
        AgentSkill::new("list-cities", "List Cities")
            .with_description("Lists the cities available in the weather service"),
    )
}

pub struct Weather;

#[async_trait]
impl SkillHandler for Weather {
    async fn handle(&self, task: Task) -> Result<Task, HandlerError> {
        let query = read_query(&task)?;
        Ok(task.complete(respond(&query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_city() {
        let reply = respond("Weather  Rio de Janeiro");
        assert!(reply.starts_with("Weather for Rio De Janeiro at "), "{}", reply);
        assert!(reply.ends_with("Temperature: 27°C\nCondition: Sunny"));
    }

    #[test]
    fn test_unknown_city() {
        assert_eq!(
            respond("weather atlantis"),
            "Weather data for atlantis is not available. Use 'list-cities' to see available cities."
        );
    }

    #[test]
    fn test_list_cities_sorted() {
        let reply = respond("list-cities");
        let lines: Vec<&str> = reply.lines().collect();
        assert_eq!(lines[0], "Available cities:");
        assert_eq!(lines[1], "Berlin");
        assert_eq!(lines.len(), 11);
    }

    #[test]
    fn test_invalid_command() {
        assert_eq!(respond("forecast"), INVALID_COMMAND);
    }
}
