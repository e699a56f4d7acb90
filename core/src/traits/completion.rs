use crate::traits::Usage;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub text: String,
    pub usage: Option<Usage>,
}

/// Single prompt in, single completion out (the legacy completions endpoint).
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> anyhow::Result<CompletionResponse>;
}
