//! Chat completion backends.

mod openai;

pub use openai::OpenAiChatModel;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for conversational completion backends.
///
/// `history` is the normalized (question, answer) pair sequence from prior
/// turns, oldest first.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[(String, String)],
        question: &str,
    ) -> Result<String>;
}
