//! The model capability used by plan generation.

use std::sync::Arc;

use async_trait::async_trait;

use super::prompt::PlanPrompt;
use crate::llm::{ChatMessage, ChatOptions, LlmClient};

/// Something that turns a plan prompt into raw response text.
///
/// One call is one request to the underlying model. Implementations must not
/// retry on their own.
#[async_trait]
pub trait PlanModel: Send + Sync {
    async fn generate(&self, prompt: &PlanPrompt, temperature: f64) -> anyhow::Result<String>;
}

/// [`PlanModel`] backed by a chat-completion [`LlmClient`].
pub struct LlmPlanModel {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl LlmPlanModel {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl PlanModel for LlmPlanModel {
    async fn generate(&self, prompt: &PlanPrompt, temperature: f64) -> anyhow::Result<String> {
        let messages = [
            ChatMessage::system(prompt.system.clone()),
            ChatMessage::user(prompt.user.clone()),
        ];
        let options = ChatOptions {
            temperature: Some(temperature),
        };

        let response = self
            .client
            .chat_completion_with_options(&self.model, &messages, options)
            .await?;

        tracing::debug!(
            model = response.model.as_deref().unwrap_or(&self.model),
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            completion_tokens = response.usage.as_ref().map(|u| u.completion_tokens),
            "Plan model responded"
        );
        if response.finish_reason.as_deref() == Some("length") {
            tracing::warn!("Plan response was cut off at the token limit");
        }

        Ok(response.content.unwrap_or_default())
    }
}
