use crate::agent::ToolRegistry;
use crate::config::Config;
use crate::error::{ArgumentError, ConfigurationError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub mod weather;

pub use weather::{OpenWeatherMap, WeatherService, WeatherTool};

/// Registry with every built-in tool, narrowed to `[tools] enabled`.
pub fn build_registry(config: &Config) -> Result<ToolRegistry, ConfigurationError> {
    let weather = OpenWeatherMap::new(config.weather_api_key()?)
        .with_geocoding_url(config.weather.geocoding_url.clone())
        .with_conditions_url(config.weather.conditions_url.clone());

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(WeatherTool::new(Arc::new(weather))))?;
    registry.retain_enabled(&config.tools.enabled)?;
    Ok(registry)
}

/// Decodes the raw argument text the model sent for `tool`.
pub fn parse_arguments(tool: &str, raw: &str) -> Result<Value, ArgumentError> {
    let raw = if raw.trim().is_empty() { "{}" } else { raw };
    serde_json::from_str(raw).map_err(|source| ArgumentError::MalformedJson {
        tool: tool.to_string(),
        source,
    })
}

/// Decodes already-parsed arguments into the tool's typed argument struct.
pub fn typed_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ArgumentError> {
    serde_json::from_value(args).map_err(|source| ArgumentError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}
