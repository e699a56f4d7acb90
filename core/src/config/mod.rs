use crate::error::ConfigurationError;
use crate::tools::weather::openweather::{DEFAULT_CONDITIONS_URL, DEFAULT_GEOCODING_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PARLANCE_DIR: &str = ".parlance";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_key: String,
    pub geocoding_url: String,
    pub conditions_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            conditions_url: DEFAULT_CONDITIONS_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolsConfig {
    /// Tools advertised to the model; empty means every registered tool.
    pub enabled: Vec<String>,
    /// Show failed tool results to the user as well as to the model.
    pub surface_failures: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub completion_model: String,
    pub transcription_model: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub system_prompt: String,
    pub tool_choice: String,
    pub weather: WeatherConfig,
    pub tools: ToolsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: None,
            api_key: String::new(),
            base_url: None,
            model: "gpt-3.5-turbo-1106".to_string(),
            completion_model: "gpt-3.5-turbo-instruct".to_string(),
            transcription_model: "whisper-1".to_string(),
            temperature: 1.0,
            max_tokens: Some(150),
            system_prompt: "You are a helpful assistant".to_string(),
            tool_choice: "auto".to_string(),
            weather: WeatherConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

pub fn get_parlance_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(PARLANCE_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_parlance_dir().join("config.toml")
}

pub fn ensure_parlance_dir() -> Result<PathBuf> {
    let dir = get_parlance_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).with_context(|| {
            format!("Failed to create parlance directory at {}", dir.display())
        })?;
    }

    Ok(dir)
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        if config_exists() {
            load_config()
        } else {
            Ok(Config::default())
        }
    }

    /// Weather key from the environment first, then the config file.
    pub fn weather_api_key(&self) -> Result<String, ConfigurationError> {
        resolve_key(
            &["WEATHER_API_KEY", "PARLANCE_WEATHER_API_KEY"],
            &self.weather.api_key,
        )
        .ok_or(ConfigurationError::MissingApiKey {
            service: "the weather service",
            env_var: "WEATHER_API_KEY",
        })
    }
}

pub(crate) fn resolve_key(env_vars: &[&str], config_key: &str) -> Option<String> {
    env_vars
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .or_else(|| (!config_key.is_empty()).then(|| config_key.to_string()))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found. Run 'parlance onboard' to set up your configuration."
            )
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", config_path.display(), e)
        }
    })?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    Ok(config)
}

pub fn save_config(config: &Config) -> Result<()> {
    ensure_parlance_dir()?;
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &Config, config_path: &Path) -> Result<()> {
    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(config_path, content)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}
