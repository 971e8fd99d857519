//! Configuration module for PageChat.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{ModePrompt, Prompts, APP_SYSTEM_TEMPLATE, EXTENSION_SYSTEM_TEMPLATE};
pub use settings::{
    BackendSettings, ChunkingSettings, EmbeddingSettings, GeneralSettings, RagSettings,
    ServerSettings, Settings,
};
