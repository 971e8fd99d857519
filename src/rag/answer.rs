//! Answer post-processing.

/// Strip the persona label the prompts ask the model to prefix its answer
/// with: everything up to and including the first colon is dropped, plus
/// surrounding whitespace.
///
/// This is a best-effort cleanup of a convention, not a guaranteed parse; an
/// answer without a colon comes back trimmed but otherwise unchanged. The
/// prompts are written to match this behavior, so it must not be "fixed"
/// independently of them.
pub fn strip_answer_label(answer: &str) -> String {
    match answer.find(':') {
        Some(i) => answer[i + 1..].trim().to_string(),
        None => answer.trim().to_string(),
    }
}
