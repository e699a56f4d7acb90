use crate::templates::{ASK_INSTRUCTIONS, CHAT_GREETING, SEPARATOR};
use anyhow::Result;
use console::style;
use parlance_core::agent::{Conversation, DispatchLoop, TurnOutcome};
use parlance_core::config::Config;
use parlance_core::error::DispatchError;
use parlance_core::tokenizer::{self, ENCODING};
use parlance_core::traits::{Completer, CompletionRequest, Usage};
use std::io::{self, BufRead, Write};

/// Prints `prompt` and reads one trimmed line; `None` on EOF.
pub fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input)? {
        0 => Ok(None),
        _ => Ok(Some(input.trim().to_string())),
    }
}

fn usage_line(usage: &Usage) -> String {
    format!(
        "tokens: {} prompt + {} completion = {} total",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    )
}

fn print_usage(usage: Option<Usage>) {
    if let Some(usage) = usage {
        println!("{}", style(usage_line(&usage)).dim());
    }
}

fn print_tokens(text: &str) {
    match tokenizer::tokenize(text) {
        Ok(tokens) => {
            println!("{}", style(format!("{}: {} tokens", ENCODING, tokens.count())).dim());
            println!("{}", style(format!("Token integers: {:?}", tokens.ids)).dim());
            println!("{}", style(format!("Token bytes: {:?}", tokens.pieces)).dim());
        }
        Err(e) => tracing::warn!(error = %e, "Could not tokenize reply"),
    }
}

fn completion_request<'a>(config: &Config, prompt: &'a str) -> CompletionRequest<'a> {
    CompletionRequest {
        prompt,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

pub async fn ask(completer: &dyn Completer, config: &Config, prompt: Option<String>) -> Result<()> {
    if let Some(prompt) = prompt {
        let response = completer.complete(completion_request(config, &prompt)).await?;
        println!("{}", response.text.trim());
        print_usage(response.usage);
        print_tokens(&response.text);
        return Ok(());
    }

    println!();
    println!("{}", style(ASK_INSTRUCTIONS).blue().italic());
    println!();

    loop {
        let Some(question) = read_line("Q: ")? else {
            break;
        };
        if question == "x" {
            break;
        }
        if question.is_empty() {
            continue;
        }

        match completer.complete(completion_request(config, &question)).await {
            Ok(response) => {
                println!("{}", style(format!("A: {}", response.text.trim())).blue());
                print_usage(response.usage);
                print_tokens(&response.text);
            }
            Err(e) => eprintln!("❌ Error: {:#}", e),
        }
        println!("\n{}", SEPARATOR);
    }

    Ok(())
}

fn print_outcome(outcome: &TurnOutcome, config: &Config) {
    for invocation in &outcome.invocations {
        if invocation.result.success {
            println!(
                "{}",
                style(format!("▌🔧 {} → {}", invocation.name, invocation.result.output)).magenta()
            );
        }
    }

    if config.tools.surface_failures {
        for failed in outcome.failed_invocations() {
            println!(
                "{}",
                style(format!(
                    "! {} failed: {}",
                    failed.name,
                    failed.result.error.as_deref().unwrap_or("unknown error")
                ))
                .yellow()
            );
        }
    }

    println!("{}", style(format!("Bot: {}", outcome.reply)).green());
    print_usage(Some(outcome.usage));
}

/// Runs one turn and decides whether the session can go on.
async fn turn(
    agent: &DispatchLoop,
    session: &mut Conversation,
    config: &Config,
    input: &str,
) -> Result<()> {
    match agent.run_turn(session, input).await {
        Ok(outcome) => {
            print_outcome(&outcome, config);
            Ok(())
        }
        // Registry and advertised schema out of sync: nothing sensible to retry.
        Err(e @ DispatchError::Configuration(_)) => Err(e.into()),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            Ok(())
        }
    }
}

pub async fn chat(agent: &DispatchLoop, config: &Config, message: Option<String>) -> Result<()> {
    let mut session = Conversation::new(Some(&config.system_prompt));
    tracing::debug!(
        session = session.id(),
        tools = ?agent.tool_registry().names(),
        "Starting chat session"
    );

    if let Some(msg) = message {
        return turn(agent, &mut session, config, &msg).await;
    }

    println!("{}", style(format!("Bot: {}", CHAT_GREETING)).cyan());

    loop {
        let Some(input) = read_line("You: ")? else {
            println!("\nGoodbye!");
            break;
        };

        match input.as_str() {
            "" => continue,
            "exit" => {
                println!("Goodbye!");
                break;
            }
            _ => turn(agent, &mut session, config, &input).await?,
        }
    }

    Ok(())
}
