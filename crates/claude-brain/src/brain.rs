//! ClaudeBrain implementation using the Anthropic Messages API.

use brain_core::{async_trait, Brain, BrainError, InboundMessage, OutboundMessage};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, ChatMessage, MessagesRequest, MessagesResponse};
use crate::config::{ClaudeBrainConfig, ANTHROPIC_VERSION};

/// A brain implementation that uses Anthropic's Messages API.
///
/// Each call is a single-turn request: the user's text is the only message and
/// the system instruction travels in the `system` field. No history is kept
/// here; the caller folds recent turns into the system instruction.
pub struct ClaudeBrain {
    client: Client,
    config: ClaudeBrainConfig,
}

impl ClaudeBrain {
    /// Create a new ClaudeBrain with the given configuration.
    pub fn new(config: ClaudeBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "ClaudeBrain initialized with model: {}, max_tokens: {}",
            config.model, config.max_tokens
        );

        Ok(Self { client, config })
    }

    /// Create a ClaudeBrain from environment variables.
    ///
    /// See [`ClaudeBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        let config = ClaudeBrainConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClaudeBrainConfig {
        &self.config
    }

    fn build_request(&self, message: &InboundMessage) -> MessagesRequest {
        MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: message.system_prompt.clone(),
            messages: vec![ChatMessage::user(&message.text)],
        }
    }

    /// Make a request to the Messages API.
    async fn create_message(&self, request: MessagesRequest) -> Result<MessagesResponse, BrainError> {
        let url = format!("{}/v1/messages", self.config.api_url.trim_end_matches('/'));

        debug!("Sending request to Anthropic API (model: {})", request.model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(BrainError::ProcessingFailed(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Brain for ClaudeBrain {
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        debug!(
            "Processing message for conversation {} ({} chars)",
            message.conversation_id,
            message.text.len()
        );

        let request = self.build_request(&message);
        let completion = self.create_message(request).await?;

        if let Some(ref usage) = completion.usage {
            debug!(
                "Token usage - input: {}, output: {}",
                usage.input_tokens, usage.output_tokens
            );
        }

        match completion.first_text() {
            Some(text) => Ok(OutboundMessage::reply_to(&message, text)),
            None => {
                warn!("No text content in response {}", completion.id);
                Err(BrainError::EmptyResponse)
            }
        }
    }

    fn name(&self) -> &str {
        "ClaudeBrain"
    }
}
