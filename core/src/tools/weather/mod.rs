pub mod openweather;
pub mod units;

pub use openweather::OpenWeatherMap;
pub use units::{Temperature, TemperatureUnit, kelvin_to_celsius, kelvin_to_fahrenheit};

use crate::error::UpstreamError;
use crate::tools::typed_args;
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const WEATHER_TOOL: &str = "get_current_weather";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub temperature_kelvin: f64,
    pub description: String,
}

#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<Coordinates, UpstreamError>;

    async fn current_conditions(&self, at: Coordinates) -> Result<Conditions, UpstreamError>;
}

/// What the tool hands back to the model. Field order is part of the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: Temperature,
    pub unit: TemperatureUnit,
    pub forecast: String,
}

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    location: String,
    #[serde(default)]
    unit: TemperatureUnit,
}

pub struct WeatherTool {
    service: Arc<dyn WeatherService>,
}

impl WeatherTool {
    pub fn new(service: Arc<dyn WeatherService>) -> Self {
        Self { service }
    }

    pub async fn lookup(
        &self,
        location: &str,
        unit: TemperatureUnit,
    ) -> Result<WeatherReport, UpstreamError> {
        let coordinates = self.service.geocode(location).await?;
        let conditions = self.service.current_conditions(coordinates).await?;

        Ok(WeatherReport {
            location: location.to_string(),
            temperature: Temperature::from_kelvin(conditions.temperature_kelvin, unit),
            unit,
            forecast: conditions.description,
        })
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        WEATHER_TOOL
    }

    fn description(&self) -> &str {
        "Get the current weather in a given location"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state, e.g. San Francisco, CA"
                },
                "unit": {
                    "type": "string",
                    "enum": ["celsius", "fahrenheit"],
                    "description": "Unit for temperature, either Celsius or Fahrenheit."
                }
            },
            "required": ["location", "unit"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let args: WeatherArgs = typed_args(WEATHER_TOOL, args)?;
        if args.location.trim().is_empty() {
            anyhow::bail!("Missing 'location' parameter");
        }

        match self.lookup(&args.location, args.unit).await {
            Ok(report) => Ok(ToolResult::success(serde_json::to_string(&report)?)),
            Err(e) => {
                tracing::warn!(
                    tool = WEATHER_TOOL,
                    location = %args.location,
                    error = %e,
                    "Weather lookup failed"
                );
                Ok(ToolResult::error(format!(
                    "Failed to get weather for {}: {}",
                    args.location, e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeWeather;

    fn paris() -> Arc<FakeWeather> {
        Arc::new(FakeWeather::new(
            Coordinates {
                lat: 48.85,
                lon: 2.35,
            },
            298.48,
            "clear sky",
        ))
    }

    #[tokio::test]
    async fn paris_in_celsius() {
        let tool = WeatherTool::new(paris());
        let result = tool
            .execute(json!({"location": "Paris, France", "unit": "celsius"}))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(
            result.output,
            r#"{"location":"Paris, France","temperature":25,"unit":"celsius","forecast":"clear sky"}"#
        );
    }

    #[tokio::test]
    async fn fahrenheit_keeps_two_decimals() {
        let tool = WeatherTool::new(paris());
        let report = tool
            .lookup("Paris, France", TemperatureUnit::Fahrenheit)
            .await
            .unwrap();
        assert_eq!(report.temperature, Temperature::Decimal(77.59));
    }

    #[tokio::test]
    async fn unit_defaults_to_celsius() {
        let tool = WeatherTool::new(paris());
        let result = tool.execute(json!({"location": "Paris"})).await.unwrap();
        assert!(result.output.contains(r#""unit":"celsius""#));
    }

    #[tokio::test]
    async fn repeated_lookups_are_byte_identical() {
        let tool = WeatherTool::new(paris());
        let args = json!({"location": "Paris, France", "unit": "fahrenheit"});
        let first = tool.execute(args.clone()).await.unwrap();
        let second = tool.execute(args).await.unwrap();
        assert_eq!(first.output.as_bytes(), second.output.as_bytes());
    }

    #[tokio::test]
    async fn geocoding_failure_returns_failed_result() {
        let service = Arc::new(FakeWeather::failing_geocode());
        let tool = WeatherTool::new(service.clone());
        let result = tool
            .execute(json!({"location": "Paris, France", "unit": "celsius"}))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.output.is_empty());
        assert!(result.error.unwrap().contains("Paris, France"));
        assert_eq!(service.conditions_calls(), 0);
    }

    #[tokio::test]
    async fn rejects_arguments_outside_schema() {
        let tool = WeatherTool::new(paris());
        assert!(
            tool.execute(json!({"location": "Paris", "unit": "kelvin"}))
                .await
                .is_err()
        );
        assert!(tool.execute(json!({"unit": "celsius"})).await.is_err());
        assert!(tool.execute(json!({"location": " "})).await.is_err());
    }

    #[test]
    fn schema_advertises_unit_enum() {
        let spec = WeatherTool::new(paris()).spec();
        assert_eq!(spec.name, "get_current_weather");
        assert_eq!(
            spec.parameters_schema["properties"]["unit"]["enum"],
            json!(["celsius", "fahrenheit"])
        );
        assert_eq!(spec.parameters_schema["required"], json!(["location", "unit"]));
    }
}
