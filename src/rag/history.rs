//! Normalization of client-supplied chat history.

use super::ChatTurn;
use crate::error::{PageChatError, Result};

/// Map client turns to the ordered (question, answer) pairs the completion
/// call expects. No deduplication, no truncation. A turn missing either field
/// fails the request rather than silently dropping data.
pub fn normalize_history(turns: &[ChatTurn]) -> Result<Vec<(String, String)>> {
    turns
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            let human = turn.human_message.clone().ok_or_else(|| {
                PageChatError::InvalidInput(format!("history[{i}] missing human_message"))
            })?;
            let bot = turn.bot_response.clone().ok_or_else(|| {
                PageChatError::InvalidInput(format!("history[{i}] missing bot_response"))
            })?;
            Ok((human, bot))
        })
        .collect()
}
