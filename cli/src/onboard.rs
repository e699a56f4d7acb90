use crate::templates::{BANNER, CHAT_MODELS};
use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select};
use parlance_core::config::{self, Config, WeatherConfig};

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

fn setup_api_key() -> Result<String> {
    let api_key: String = Input::new()
        .with_prompt("Enter your OpenAI API key")
        .interact_text()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        return Err(anyhow::anyhow!("API key cannot be empty"));
    }

    Ok(api_key.trim().to_string())
}

fn setup_model() -> Result<String> {
    let selection = Select::new()
        .with_prompt("Select your chat model")
        .items(CHAT_MODELS)
        .default(0)
        .interact()
        .context("Failed to select model")?;

    Ok(CHAT_MODELS[selection].to_string())
}

fn setup_weather_key() -> Result<String> {
    let key: String = Input::new()
        .with_prompt("Enter your OpenWeatherMap API key (leave empty to skip)")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read weather API key")?;

    Ok(key.trim().to_string())
}

pub fn run_onboard() -> Result<Config> {
    println!("{}", style(BANNER).cyan().bold());

    println!("  {}", style("Welcome to parlance!").white().bold());
    println!(
        "  {}",
        style("This wizard writes your configuration file.").dim()
    );
    println!();

    print_step(1, 3, "API Key Setup");
    let api_key = setup_api_key()?;

    print_step(2, 3, "Model Selection");
    let model = setup_model()?;

    print_step(3, 3, "Weather Tool");
    let weather_key = setup_weather_key()?;
    if weather_key.is_empty() {
        println!(
            "  {} No weather key saved; set WEATHER_API_KEY before using {}",
            style("!").yellow(),
            style("parlance assist").cyan()
        );
    }

    let config = Config {
        api_key,
        model,
        weather: WeatherConfig {
            api_key: weather_key,
            ..Default::default()
        },
        ..Default::default()
    };

    println!();
    println!("  {} Configuration complete!", style("✓").green().bold());
    println!(
        "  {} Config saved to {}",
        style("→").green(),
        style(config::get_config_path().display()).cyan()
    );
    println!();
    println!(
        "  {} You can now run: {}",
        style("→").green(),
        style("parlance").cyan().bold()
    );
    println!();

    Ok(config)
}
