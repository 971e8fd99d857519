//! OpenAI chat completion implementation.

use super::ChatModel;
use crate::error::{PageChatError, Result};
use crate::openai::{create_client, is_transient};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// OpenAI-backed chat model.
pub struct OpenAiChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiChatModel {
    /// Create a new chat model client.
    pub fn new(model: &str, temperature: f32, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client(timeout)?,
            model: model.to_string(),
            temperature,
        })
    }

    fn build_messages(
        system_prompt: &str,
        history: &[(String, String)],
        question: &str,
    ) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(history.len() * 2 + 2);

        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|e| PageChatError::Completion(e.to_string()))?
                .into(),
        );

        for (human, bot) in history {
            messages.push(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(human.as_str())
                    .build()
                    .map_err(|e| PageChatError::Completion(e.to_string()))?
                    .into(),
            );
            messages.push(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(bot.as_str())
                    .build()
                    .map_err(|e| PageChatError::Completion(e.to_string()))?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(question)
                .build()
                .map_err(|e| PageChatError::Completion(e.to_string()))?
                .into(),
        );

        Ok(messages)
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[(String, String)],
        question: &str,
    ) -> Result<String> {
        let messages = Self::build_messages(system_prompt, history, question)?;

        debug!(
            "Requesting completion from {} with {} messages",
            self.model,
            messages.len()
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| PageChatError::Completion(e.to_string()))?;

        // One bounded retry on transient transport failure.
        let response = match self.client.chat().create(request.clone()).await {
            Ok(response) => response,
            Err(e) if is_transient(&e) => {
                warn!("Transient completion failure, retrying once: {e}");
                self.client
                    .chat()
                    .create(request)
                    .await
                    .map_err(|e| PageChatError::OpenAI(format!("Completion API error: {e}")))?
            }
            Err(e) => return Err(PageChatError::OpenAI(format!("Completion API error: {e}"))),
        };

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| PageChatError::Completion("Empty response from LLM".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_interleave_history_pairs() {
        let history = vec![
            ("first question".to_string(), "first answer".to_string()),
            ("second question".to_string(), "second answer".to_string()),
        ];
        let messages =
            OpenAiChatModel::build_messages("system text", &history, "current question").unwrap();

        // system + 2 pairs + current question
        assert_eq!(messages.len(), 6);
        assert!(matches!(
            messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(
            messages[2],
            ChatCompletionRequestMessage::Assistant(_)
        ));
        assert!(matches!(messages[5], ChatCompletionRequestMessage::User(_)));
    }
}
