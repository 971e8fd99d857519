//! Retrieval-augmented chat: prompt composition, history normalization, and
//! answer post-processing.

pub mod answer;
pub mod history;

pub use answer::strip_answer_label;
pub use history::normalize_history;

use crate::chunking::ContextChunk;
use crate::config::Prompts;
use serde::{Deserialize, Serialize};

/// Which chat surface a request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// Chat over HTML submitted with the request; no persistence.
    Extension,
    /// Chat over a previously saved page; requires authentication.
    App,
}

/// One prior exchange as submitted by the client.
///
/// Both fields are optional at the wire level so a malformed turn reaches the
/// history normalizer, which fails the request instead of dropping data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(default)]
    pub human_message: Option<String>,
    #[serde(default)]
    pub bot_response: Option<String>,
}

/// The sole chat response shape, for success and every short-circuit alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub bot_response: String,
    pub human_message: String,
}

impl AnswerResult {
    /// Build a response echoing the question it answers.
    pub fn new(bot_response: impl Into<String>, question: &str) -> Self {
        Self {
            bot_response: bot_response.into(),
            human_message: question.to_string(),
        }
    }
}

/// Compose the system instruction for a mode with the retrieved context
/// interpolated. The templates themselves are never mutated.
pub fn compose_system_prompt(prompts: &Prompts, mode: ChatMode, chunks: &[ContextChunk]) -> String {
    let template = match mode {
        ChatMode::Extension => &prompts.extension.system,
        ChatMode::App => &prompts.app.system,
    };
    Prompts::render(template, &format_context(chunks))
}

/// Join retrieved chunk texts into the context block of the prompt.
fn format_context(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> ContextChunk {
        ContextChunk {
            text: text.to_string(),
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_compose_interpolates_retrieved_context() {
        let prompts = Prompts::defaults();
        let composed = compose_system_prompt(
            &prompts,
            ChatMode::Extension,
            &[chunk("The sky is blue.")],
        );
        assert!(composed.contains("The sky is blue."));
        assert!(!composed.contains("{{context}}"));
    }

    #[test]
    fn test_compose_selects_template_by_mode() {
        let prompts = Prompts::defaults();
        let ext = compose_system_prompt(&prompts, ChatMode::Extension, &[]);
        let app = compose_system_prompt(&prompts, ChatMode::App, &[]);
        assert_ne!(ext, app);
    }

    #[test]
    fn test_compose_with_no_chunks_leaves_context_empty() {
        let prompts = Prompts::defaults();
        let composed = compose_system_prompt(&prompts, ChatMode::App, &[]);
        assert!(composed.contains("-----------------"));
    }

    #[test]
    fn test_chat_turn_deserializes_with_missing_fields() {
        let turn: ChatTurn = serde_json::from_str(r#"{"human_message": "hi"}"#).unwrap();
        assert_eq!(turn.human_message.as_deref(), Some("hi"));
        assert!(turn.bot_response.is_none());
    }
}
