//! CompletionClient — fixed sampling defaults over a [`Provider`].
//!
//! The client does not prepend a system prompt and does not swallow errors.
//! The orchestrator owns both decisions.

use parley_config::AppConfig;
use parley_core::error::ProviderError;
use parley_core::message::Message;
use parley_core::provider::{Provider, ProviderRequest, ToolDefinition};
use std::sync::Arc;
use tracing::debug;

use crate::openai_compat::OpenAiCompatProvider;

pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Per-call overrides. Unset fields take the client defaults.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Tools advertised to the model. Non-empty means `tool_choice = "auto"`.
    pub tools: Vec<ToolDefinition>,
}

impl CompletionOptions {
    pub fn with_tools(tools: Vec<ToolDefinition>) -> Self {
        Self {
            tools,
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Override the defaults used when a call does not set its own.
    pub fn with_defaults(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Build the HTTP-backed client described by `[completion]`.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let provider = OpenAiCompatProvider::from_config(config)?;
        Ok(Self::new(Arc::new(provider), &config.completion.model)
            .with_defaults(config.completion.temperature, config.completion.max_tokens))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Build the wire request for `messages` under `options`.
    pub fn build_request(
        &self,
        messages: &[Message],
        options: CompletionOptions,
    ) -> ProviderRequest {
        let tool_choice = if options.tools.is_empty() {
            None
        } else {
            Some("auto".to_string())
        };

        ProviderRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: options.temperature.unwrap_or(self.temperature),
            max_tokens: Some(options.max_tokens.unwrap_or(self.max_tokens)),
            tools: options.tools,
            tool_choice,
        }
    }

    /// Send `messages` and return the assistant message verbatim,
    /// tool-call directives included.
    pub async fn complete(
        &self,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<Message, ProviderError> {
        let request = self.build_request(messages, options);
        debug!(
            provider = %self.provider.name(),
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Requesting completion"
        );

        let response = self.provider.complete(request).await?;
        if let Some(usage) = &response.usage {
            debug!(total_tokens = usage.total_tokens, "Completion usage");
        }
        Ok(response.message)
    }
}
