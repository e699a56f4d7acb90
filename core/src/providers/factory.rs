use crate::config::{Config, resolve_key};
use crate::error::ConfigurationError;
use crate::providers::OpenAIProvider;
use anyhow::{Result, anyhow};

/// Builds the provider named in the config. Every supported backend speaks
/// the OpenAI wire format, so one concrete type serves chat, completion and
/// audio.
pub fn create_provider(config: &Config) -> Result<OpenAIProvider> {
    let provider_name = config.provider.as_deref().unwrap_or("openai");

    let provider = match provider_name.to_lowercase().as_str() {
        "openai" => {
            let api_key = resolve_key(
                &["OPENAI_API_KEY", "PARLANCE_OPENAI_API_KEY"],
                &config.api_key,
            )
            .ok_or(ConfigurationError::MissingApiKey {
                service: "OpenAI",
                env_var: "OPENAI_API_KEY",
            })?;
            let mut provider = OpenAIProvider::new(api_key);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            provider
        }
        "openai-compatible" => {
            let base_url = config
                .base_url
                .as_deref()
                .ok_or_else(|| anyhow!("Provider 'openai-compatible' requires base_url"))?;
            let api_key = resolve_key(&["PARLANCE_OPENAI_API_KEY"], &config.api_key)
                .unwrap_or_default();
            OpenAIProvider::new(api_key).with_base_url(base_url)
        }
        _ => {
            return Err(anyhow!(
                "Unknown provider: {}. Available: openai, openai-compatible",
                provider_name
            ));
        }
    };

    Ok(provider
        .with_model(config.model.clone())
        .with_completion_model(config.completion_model.clone())
        .with_transcription_model(config.transcription_model.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_rejected() {
        let config = Config {
            provider: Some("carrier-pigeon".into()),
            ..Default::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    #[test]
    fn compatible_provider_needs_base_url() {
        let config = Config {
            provider: Some("openai-compatible".into()),
            ..Default::default()
        };
        assert!(create_provider(&config).is_err());

        let config = Config {
            provider: Some("OpenAI-Compatible".into()),
            base_url: Some("http://localhost:11434/v1".into()),
            ..Default::default()
        };
        assert!(create_provider(&config).is_ok());
    }
}
