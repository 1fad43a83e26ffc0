//! Weather lookup tool: simulated conditions for a fixed set of cities.
//!
//! Lets the agent loop be exercised end-to-end without network access.

use async_trait::async_trait;
use reactloop_core::error::ToolError;
use reactloop_core::tool::{Tool, ToolOutput};
use tracing::debug;

/// (city, °F, condition, humidity %)
const CITIES: &[(&str, i32, &str, u32)] = &[
    ("new york", 45, "Partly Cloudy", 65),
    ("london", 50, "Rainy", 80),
    ("tokyo", 55, "Clear", 55),
    ("sydney", 75, "Sunny", 60),
    ("paris", 48, "Overcast", 70),
    ("mumbai", 85, "Humid", 85),
];

pub struct WeatherLookupTool;

#[async_trait]
impl Tool for WeatherLookupTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get current weather information for a city. Returns temperature, condition, and humidity."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "Name of the city"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let city = arguments["city"]
            .as_str()
            .ok_or_else(|| ToolError::invalid_arguments("Missing 'city' argument"))?;

        let key = city.trim().to_lowercase();
        let Some(&(_, temp_f, condition, humidity)) =
            CITIES.iter().find(|(name, ..)| *name == key)
        else {
            debug!(city, "No weather data for city");
            let available: Vec<&str> = CITIES.iter().map(|(name, ..)| *name).collect();
            return Ok(ToolOutput::text(format!(
                "Weather data not available for '{}'. Available cities: {}",
                city,
                available.join(", ")
            )));
        };

        let temp_c = f64::from(temp_f - 32) * 5.0 / 9.0;
        let content = format!(
            "Weather in {}:\n- Temperature: {}°F ({:.1}°C)\n- Condition: {}\n- Humidity: {}%",
            title_case(&key),
            temp_f,
            temp_c,
            condition,
            humidity
        );

        Ok(ToolOutput::text(content).with_data(serde_json::json!({
            "city": key,
            "temperature_f": temp_f,
            "condition": condition,
            "humidity": humidity,
        })))
    }
}

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
