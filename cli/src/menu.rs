use crate::repl::{self, read_line};
use crate::templates::{BANNER, MENU};
use crate::{audio, build_agent};
use anyhow::Result;
use console::style;
use parlance_core::config::Config;
use parlance_core::providers::OpenAIProvider;
use std::path::PathBuf;
use std::sync::Arc;

enum Choice {
    Ask,
    Chat,
    Assist,
    Transcribe,
    Translate,
    Exit,
}

fn parse_choice(input: &str) -> Option<Choice> {
    match input {
        "1" => Some(Choice::Ask),
        "2" => Some(Choice::Chat),
        "3" => Some(Choice::Assist),
        "4" => Some(Choice::Transcribe),
        "5" => Some(Choice::Translate),
        "6" => Some(Choice::Exit),
        _ => None,
    }
}

async fn transcribe(provider: &OpenAIProvider, translate: bool) -> Result<()> {
    let Some(path) = read_line("Audio file: ")? else {
        return Ok(());
    };
    if path.is_empty() {
        return Ok(());
    }
    audio::run(provider, &PathBuf::from(path), translate).await
}

async fn chat(config: &Config, provider: Arc<OpenAIProvider>, with_tools: bool) -> Result<()> {
    let agent = build_agent(config, provider, with_tools)?;
    repl::chat(&agent, config, None).await
}

pub async fn run(config: &Config, provider: Arc<OpenAIProvider>) -> Result<()> {
    println!("{}", style(BANNER).cyan().bold());

    loop {
        println!("{}", MENU);
        let Some(input) = read_line("Enter your choice: ")? else {
            return Ok(());
        };

        let result = match parse_choice(&input) {
            Some(Choice::Ask) => repl::ask(provider.as_ref(), config, None).await,
            Some(Choice::Chat) => chat(config, provider.clone(), false).await,
            Some(Choice::Assist) => chat(config, provider.clone(), true).await,
            Some(Choice::Transcribe) => transcribe(&provider, false).await,
            Some(Choice::Translate) => transcribe(&provider, true).await,
            Some(Choice::Exit) => return Ok(()),
            None => {
                println!("Invalid choice");
                continue;
            }
        };

        if let Err(e) = result {
            eprintln!("❌ Error: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choices_are_literal() {
        assert!(matches!(parse_choice("1"), Some(Choice::Ask)));
        assert!(matches!(parse_choice("6"), Some(Choice::Exit)));
        assert!(parse_choice(" 1").is_none());
        assert!(parse_choice("exit").is_none());
    }
}
