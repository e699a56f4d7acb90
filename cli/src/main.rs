use anyhow::Result;
use clap::{Parser, Subcommand};
use parlance_core::{agent, config, providers, tools};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod audio;
mod menu;
mod onboard;
mod repl;
mod templates;

#[derive(Parser)]
#[command(name = "parlance")]
#[command(about = "parlance - chat, completions, transcription and function calling from the terminal", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Onboard,
    /// Interactive numbered menu
    Menu,
    /// Legacy text completion
    Ask {
        #[arg(short, long)]
        prompt: Option<String>,
    },
    /// Chat without tools
    Chat {
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Chat with function calling (weather lookup)
    Assist {
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Transcribe an audio file, optionally translating it to English
    Transcribe {
        file: PathBuf,
        #[arg(long)]
        translate: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "parlance=debug,parlance_core=debug"
    } else {
        "parlance=warn,parlance_core=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// Chat loop over `provider`; tools are registered only when `with_tools`.
pub(crate) fn build_agent(
    config: &config::Config,
    provider: Arc<providers::OpenAIProvider>,
    with_tools: bool,
) -> Result<agent::DispatchLoop> {
    let registry = if with_tools {
        tools::build_registry(config)?
    } else {
        agent::ToolRegistry::new()
    };

    Ok(agent::DispatchLoop::new(provider, Arc::new(registry))
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_tool_choice(config.tool_choice.parse()?))
}

fn load() -> Result<(config::Config, Arc<providers::OpenAIProvider>)> {
    let config = config::Config::load_or_init()?;
    let provider = Arc::new(providers::create_provider(&config)?);
    Ok((config, provider))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or_else(|| {
        if !config::config_exists() && std::env::var("OPENAI_API_KEY").is_err() {
            Commands::Onboard
        } else {
            Commands::Menu
        }
    });

    match command {
        Commands::Onboard => {
            let onboard_config = onboard::run_onboard().map_err(|e| {
                eprintln!("❌ Onboarding failed: {}", e);
                anyhow::anyhow!("Onboarding failed: {}", e)
            })?;
            config::save_config(&onboard_config)?;
            Ok(())
        }
        Commands::Menu => {
            let (config, provider) = load()?;
            menu::run(&config, provider).await
        }
        Commands::Ask { prompt } => {
            let (config, provider) = load()?;
            repl::ask(provider.as_ref(), &config, prompt).await
        }
        Commands::Chat { message } => {
            let (config, provider) = load()?;
            let agent = build_agent(&config, provider, false)?;
            repl::chat(&agent, &config, message).await
        }
        Commands::Assist { message } => {
            let (config, provider) = load()?;
            let agent = build_agent(&config, provider, true)?;
            repl::chat(&agent, &config, message).await
        }
        Commands::Transcribe { file, translate } => {
            let (_, provider) = load()?;
            audio::run(provider.as_ref(), &file, translate).await
        }
    }
}
