use anyhow::{Result, bail};
use console::style;
use parlance_core::traits::Transcriber;
use std::path::Path;

pub async fn run(transcriber: &dyn Transcriber, file: &Path, translate: bool) -> Result<()> {
    if !file.is_file() {
        bail!("Audio file not found: {}", file.display());
    }

    println!("{}", style("Transcribing...").dim());
    let transcript = transcriber.transcribe(file).await?;
    println!("{} File transcribed successfully!", style("✓").green());
    println!();
    println!("{}", style(&transcript).blue());

    if translate {
        println!();
        println!("{}", style("Translating...").dim());
        let translation = transcriber.translate(file).await?;
        println!("{}", style(&translation).green());
    }

    Ok(())
}
