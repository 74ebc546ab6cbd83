//! Provider factory.

use std::sync::Arc;

use crate::agent::provider::LlmProvider;
use crate::agent::providers::OpenAiProvider;
use crate::config::{ModelConfig, ProviderKind};
use crate::error::ConfigError;

/// Creates the [`LlmProvider`] for the configured vendor.
///
/// Groq and OpenAI both go through [`OpenAiProvider`].
///
/// # Errors
///
/// [`ConfigError::ApiKeyMissing`] when no key is configured.
pub fn create_provider(config: &ModelConfig) -> Result<Arc<dyn LlmProvider>, ConfigError> {
    match config.provider {
        ProviderKind::Groq | ProviderKind::OpenAi => Ok(Arc::new(OpenAiProvider::new(config)?)),
    }
}
