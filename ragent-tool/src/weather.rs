//! The `get_current_weather` tool.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Temperature scale for a weather report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a Celsius reading into this unit.
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

/// Arguments for `get_current_weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherArgs {
    /// The city, e.g. 'Tokyo' or 'Cairo, Egypt'
    pub location: String,
    /// Temperature unit for the report
    #[serde(default)]
    pub unit: TemperatureUnit,
}

/// Current conditions at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: f64,
    pub unit: TemperatureUnit,
    pub condition: String,
}

/// A source of current weather conditions.
#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn current_weather(
        &self,
        location: &str,
        unit: TemperatureUnit,
    ) -> Result<WeatherReport, ToolError>;
}

/// Fixed readings in Celsius, matched by case-insensitive substring.
const MOCK_READINGS: [(&str, f64, &str); 4] = [
    ("Singapore", 30.0, "Thunderstorms"),
    ("Cairo", 25.0, "Sunny"),
    ("London", 10.0, "Foggy"),
    ("Tokyo", 18.0, "Clear"),
];

const FALLBACK_CELSIUS: f64 = 22.0;

/// Offline weather source with a small fixed table.
///
/// A known city is reported under its canonical name. Unknown locations
/// echo the input and report 22°C with an `Unknown` condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockWeatherService;

#[async_trait]
impl WeatherService for MockWeatherService {
    async fn current_weather(
        &self,
        location: &str,
        unit: TemperatureUnit,
    ) -> Result<WeatherReport, ToolError> {
        let needle = location.to_lowercase();
        let (name, celsius, condition) = MOCK_READINGS
            .iter()
            .find(|(city, _, _)| needle.contains(&city.to_lowercase()))
            .copied()
            .unwrap_or((location, FALLBACK_CELSIUS, "Unknown"));

        Ok(WeatherReport {
            location: name.to_string(),
            temperature: unit.from_celsius(celsius),
            unit,
            condition: condition.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_cities_match_case_insensitively() {
        let report =
            MockWeatherService.current_weather("tokyo, Japan", TemperatureUnit::Celsius).await.unwrap();
        assert_eq!(report.location, "Tokyo");
        assert_eq!(report.temperature, 18.0);
        assert_eq!(report.condition, "Clear");

        let report =
            MockWeatherService.current_weather("SINGAPORE", TemperatureUnit::Celsius).await.unwrap();
        assert_eq!(report.location, "Singapore");
        assert_eq!(report.condition, "Thunderstorms");
    }

    #[tokio::test]
    async fn fahrenheit_is_converted() {
        let report =
            MockWeatherService.current_weather("Cairo", TemperatureUnit::Fahrenheit).await.unwrap();
        assert_eq!(report.temperature, 77.0);
        assert_eq!(report.unit, TemperatureUnit::Fahrenheit);
    }

    #[tokio::test]
    async fn unknown_location_falls_back() {
        let report =
            MockWeatherService.current_weather("Reykjavik", TemperatureUnit::Celsius).await.unwrap();
        assert_eq!(report.location, "Reykjavik");
        assert_eq!(report.temperature, 22.0);
        assert_eq!(report.condition, "Unknown");
    }

    #[test]
    fn unit_defaults_to_celsius() {
        let args: WeatherArgs = serde_json::from_str(r#"{"location":"London"}"#).unwrap();
        assert_eq!(args.unit, TemperatureUnit::Celsius);
    }
}
