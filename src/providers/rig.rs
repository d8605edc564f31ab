//! rig-core integration for free-text review generation.
//!
//! Uses rig-core's provider clients and Agent abstraction for
//! multi-provider support: Gemini, Anthropic, OpenAI, and any
//! OpenAI-compatible API.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers;

use crate::config::ProviderConfig;
use crate::models::ProviderName;
use crate::review::prompt::build_prompt;

use super::{GeneratorError, ReviewGenerator};

/// Maximum tokens per completion response. Reviews are short; this is
/// headroom for thinking models that spend budget on reasoning tokens.
const MAX_TOKENS: u64 = 8192;

/// Preamble framing the reviewer role.
const SYSTEM_PROMPT: &str = "You are an expert code reviewer. You annotate diffs with concise, \
actionable line comments and never restate code that is already correct.";

/// Build a completion agent from a rig-core client and prompt it.
///
/// Always sets `max_tokens` — all rig-core providers support it and
/// without it some (e.g. Gemini) default to a low limit that truncates
/// responses.
macro_rules! prompt_completion {
    ($client:expr, $model:expr, $user:expr, $label:expr) => {{
        let agent = $client
            .agent($model)
            .preamble(SYSTEM_PROMPT)
            .temperature(0.0)
            .max_tokens(MAX_TOKENS)
            .build();
        agent
            .prompt($user)
            .await
            .map_err(|e| GeneratorError::ApiError(format!("{} API error: {e}", $label)))
    }};
}

/// Create a rig-core client using the `Client::new(api_key)` convention.
macro_rules! new_client {
    ($provider_mod:path, $api_key:expr, $label:expr) => {{
        <$provider_mod>::new($api_key).map_err(|e| {
            GeneratorError::ApiError(format!("failed to create {} client: {e}", $label))
        })
    }};
}

/// rig-core based review generator.
///
/// The provider name in config selects which rig-core provider to use.
#[derive(Debug)]
pub struct RigGenerator {
    config: ProviderConfig,
}

impl RigGenerator {
    /// Create a generator; fails fast when no API key is configured.
    pub fn new(config: ProviderConfig) -> Result<Self, GeneratorError> {
        if config.api_key.is_none() {
            return Err(GeneratorError::NotConfigured(format!(
                "no API key found for provider '{}'. Set {} or the provider-specific env var.",
                config.name,
                crate::constants::ENV_API_KEY
            )));
        }
        Ok(Self { config })
    }

    /// Get the API key or return an error.
    fn api_key(&self) -> Result<&str, GeneratorError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| GeneratorError::NotConfigured("missing API key".to_string()))
    }

    /// Require `base_url` for OpenAI-compatible providers.
    fn require_base_url(&self) -> Result<&str, GeneratorError> {
        self.config.base_url.as_deref().ok_or_else(|| {
            GeneratorError::NotConfigured(
                "openai-compatible provider requires base_url to be set".to_string(),
            )
        })
    }

    /// Make a completion call through rig-core and return the raw
    /// response text.
    async fn call(&self, user_prompt: &str) -> Result<String, GeneratorError> {
        let api_key = self.api_key()?;
        let model = self.config.model.as_str();

        match self.config.name {
            ProviderName::Gemini => {
                let client = new_client!(providers::gemini::Client, api_key, "Gemini")?;
                prompt_completion!(client, model, user_prompt, "Gemini")
            }
            ProviderName::Anthropic => {
                let client: providers::anthropic::Client = providers::anthropic::Client::builder()
                    .api_key(api_key)
                    .build()
                    .map_err(|e| {
                        GeneratorError::ApiError(format!("failed to create Anthropic client: {e}"))
                    })?;
                prompt_completion!(client, model, user_prompt, "Anthropic")
            }
            ProviderName::OpenAI => {
                let mut builder = providers::openai::CompletionsClient::builder().api_key(api_key);
                if let Some(ref base_url) = self.config.base_url {
                    builder = builder.base_url(base_url);
                }
                let client: providers::openai::CompletionsClient =
                    builder.build().map_err(|e| {
                        GeneratorError::ApiError(format!("failed to create OpenAI client: {e}"))
                    })?;
                prompt_completion!(client, model, user_prompt, "OpenAI")
            }
            ProviderName::OpenAICompatible => {
                let base_url = self.require_base_url()?;
                let client: providers::openai::CompletionsClient =
                    providers::openai::CompletionsClient::builder()
                        .api_key(api_key)
                        .base_url(base_url)
                        .build()
                        .map_err(|e| {
                            GeneratorError::ApiError(format!(
                                "failed to create OpenAI-compatible client: {e}"
                            ))
                        })?;
                prompt_completion!(client, model, user_prompt, "OpenAI-compatible")
            }
        }
    }
}

#[async_trait]
impl ReviewGenerator for RigGenerator {
    async fn generate(
        &self,
        file_path: &str,
        diff: &str,
        guidelines: &str,
        history: &str,
    ) -> Result<String, GeneratorError> {
        let prompt = build_prompt(file_path, diff, guidelines, history);
        self.call(&prompt).await
    }
}
