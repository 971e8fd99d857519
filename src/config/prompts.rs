//! System-instruction templates for the two chat modes.
//!
//! Templates can be customized from the config file; defaults are embedded
//! here. Both templates carry a `{{context}}` placeholder that the prompt
//! composer fills with the retrieved page text, and both instruct the model
//! to prefix its answer with the persona name and a colon, which the answer
//! post-processor strips.

use serde::{Deserialize, Serialize};

/// Collection of chat-mode prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub extension: ModePrompt,
    pub app: ModePrompt,
}

impl Default for Prompts {
    fn default() -> Self {
        Self::defaults()
    }
}

/// The system instruction for one chat mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModePrompt {
    pub system: String,
}

/// Extension mode: broad. The model may recommend, translate, and fall back
/// to its own knowledge when the page does not contain the answer.
pub const EXTENSION_SYSTEM_TEMPLATE: &str = r#"I want you to act as the webpage I am having a conversation with. Your name is "PageChat". Answer my questions from the given webpage text. Your answers should be original, concise, accurate, and helpful. You can recommend, translate, and do anything based on the context given. If the answer is not included in the text but you know it, you may respond with it; otherwise say exactly "Sorry, I don't know" and stop. Never break character. Prefix every answer with your name followed by a colon. Answer in markdown format.
-----------------
{{context}}
"#;

/// App mode: strict. Answers come only from the saved page text.
pub const APP_SYSTEM_TEMPLATE: &str = r#"I want you to act as the webpage I am having a conversation with. Your name is "PageChat". Answer my questions only from the given webpage text. Your answers should be original, concise, accurate, and helpful. If the answer is not included in the text, politely decline and say exactly "Sorry, I don't know" and stop. Never break character. Prefix every answer with your name followed by a colon. Answer in markdown format.
-----------------
{{context}}
"#;

impl Prompts {
    /// Default templates for both modes.
    pub fn defaults() -> Self {
        Self {
            extension: ModePrompt {
                system: EXTENSION_SYSTEM_TEMPLATE.to_string(),
            },
            app: ModePrompt {
                system: APP_SYSTEM_TEMPLATE.to_string(),
            },
        }
    }

    /// Interpolate `{{context}}` into a template without mutating it.
    pub fn render(template: &str, context: &str) -> String {
        template.replace("{{context}}", context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_context_placeholder() {
        let prompts = Prompts::defaults();
        let rendered = Prompts::render(&prompts.app.system, "The sky is blue.");
        assert!(rendered.contains("The sky is blue."));
        assert!(!rendered.contains("{{context}}"));
        // The template itself is untouched.
        assert!(prompts.app.system.contains("{{context}}"));
    }

    #[test]
    fn test_mode_templates_differ() {
        let prompts = Prompts::defaults();
        assert_ne!(prompts.extension.system, prompts.app.system);
        assert!(prompts.extension.system.contains("recommend"));
        assert!(prompts.app.system.contains("only from the given webpage text"));
    }
}
