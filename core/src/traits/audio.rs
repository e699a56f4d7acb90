use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Speech to text in the spoken language.
    async fn transcribe(&self, audio: &Path) -> anyhow::Result<String>;

    /// Speech to English text.
    async fn translate(&self, audio: &Path) -> anyhow::Result<String>;
}
