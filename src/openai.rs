//! OpenAI client construction with an explicit request timeout.
//!
//! Every OpenAI round-trip in the pipeline (embedding, chat completion) is a
//! blocking remote call from the request's point of view, so the HTTP client
//! always carries a timeout rather than waiting indefinitely.

use crate::error::{PageChatError, Result};
use async_openai::error::OpenAIError;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI client whose requests time out after `timeout`.
pub fn create_client(timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| PageChatError::Config(format!("Failed to create HTTP client: {e}")))?;

    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http_client))
}

/// Whether an OpenAI API error is a transient transport failure worth one
/// retry (timeouts, connection resets), as opposed to an API rejection.
pub fn is_transient(err: &OpenAIError) -> bool {
    matches!(err, OpenAIError::Reqwest(_))
}
