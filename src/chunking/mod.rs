//! Fixed-size chunking of sanitized page text.
//!
//! Chunks are the unit of retrieval. They live for a single request and are
//! never persisted.

use serde::{Deserialize, Serialize};

/// A bounded-size segment of sanitized page text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextChunk {
    /// Text content of this chunk.
    pub text: String,
    /// Label for where the text came from ("extension" or a page id).
    pub source: String,
}

/// Split text into consecutive chunks of at most `max_chars` characters.
///
/// No overlap; boundaries fall on char boundaries; concatenating the chunk
/// texts in order reconstructs the input exactly. Empty input yields no
/// chunks, and the pipeline then runs with empty retrieved context.
pub fn split_into_chunks(text: &str, source: &str, max_chars: usize) -> Vec<ContextChunk> {
    if text.is_empty() || max_chars == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut buf = String::new();
    let mut count = 0usize;

    for ch in text.chars() {
        buf.push(ch);
        count += 1;
        if count == max_chars {
            chunks.push(ContextChunk {
                text: std::mem::take(&mut buf),
                source: source.to_string(),
            });
            count = 0;
        }
    }
    if !buf.is_empty() {
        chunks.push(ContextChunk {
            text: buf,
            source: source.to_string(),
        });
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_count_is_ceil_of_length_over_size() {
        let text = "a".repeat(2500);
        let chunks = split_into_chunks(&text, "extension", 1000);
        assert_eq!(chunks.len(), 3); // ceil(2500 / 1000)
        assert_eq!(chunks[0].text.len(), 1000);
        assert_eq!(chunks[2].text.len(), 500);
    }

    #[test]
    fn test_concatenation_reconstructs_input() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let chunks = split_into_chunks(&text, "extension", 333);
        let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        let chunks = split_into_chunks(&"x".repeat(2000), "extension", 1000);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| !c.text.is_empty()));
    }

    #[test]
    fn test_short_input_yields_single_chunk() {
        let chunks = split_into_chunks("short", "page-1", 1000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short");
        assert_eq!(chunks[0].source, "page-1");
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(split_into_chunks("", "extension", 1000).is_empty());
    }

    #[test]
    fn test_multibyte_boundaries() {
        let text = "åäö".repeat(10); // 30 chars, 60 bytes
        let chunks = split_into_chunks(&text, "extension", 7);
        assert_eq!(chunks.len(), 5); // ceil(30 / 7)
        let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_deterministic_boundaries() {
        let text = "determinism check ".repeat(100);
        let a = split_into_chunks(&text, "s", 64);
        let b = split_into_chunks(&text, "s", 64);
        assert_eq!(
            a.iter().map(|c| &c.text).collect::<Vec<_>>(),
            b.iter().map(|c| &c.text).collect::<Vec<_>>()
        );
    }
}
