use anyhow::Result;

pub const ENCODING: &str = "cl100k_base";

/// A text split into `cl100k_base` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBreakdown {
    pub ids: Vec<u32>,
    pub pieces: Vec<String>,
}

impl TokenBreakdown {
    pub fn count(&self) -> usize {
        self.ids.len()
    }
}

/// Encodes `text` as plain text; special-token markers are not recognised.
pub fn tokenize(text: &str) -> Result<TokenBreakdown> {
    let bpe = tiktoken_rs::cl100k_base()?;
    let ids = bpe.encode_ordinary(text);
    let pieces = bpe.split_by_token_ordinary(text)?;

    tracing::debug!(encoding = ENCODING, tokens = ids.len(), "Tokenized text");
    Ok(TokenBreakdown { ids, pieces })
}
