//! Per-request vector index over context chunks.
//!
//! The index is rebuilt from scratch for every chat request and discarded
//! with the response; nothing here is shared or persisted. Reusing an index
//! across requests for the same saved page is a possible optimization that is
//! deliberately not attempted.

use crate::chunking::ContextChunk;
use crate::embedding::Embedder;
use crate::error::{PageChatError, Result};
use std::sync::Arc;
use tracing::debug;

/// A queryable similarity index scoped to a single request.
pub struct ContextIndex {
    embedder: Arc<dyn Embedder>,
    entries: Vec<(ContextChunk, Vec<f32>)>,
}

impl ContextIndex {
    /// Embed all chunks and build the index.
    pub async fn build(embedder: Arc<dyn Embedder>, chunks: Vec<ContextChunk>) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(PageChatError::Index(format!(
                "Embedding count mismatch: {} chunks, {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        debug!("Built context index over {} chunks", chunks.len());

        Ok(Self {
            embedder,
            entries: chunks.into_iter().zip(embeddings).collect(),
        })
    }

    /// Return the top-k chunks most similar to the question.
    pub async fn query(&self, question: &str, k: usize) -> Result<Vec<ContextChunk>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(question).await?;

        let mut scored: Vec<(f32, &ContextChunk)> = self
            .entries
            .iter()
            .map(|(chunk, embedding)| (cosine_similarity(&query_embedding, embedding), chunk))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored.into_iter().map(|(_, chunk)| chunk.clone()).collect())
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Embeds texts as letter-frequency vectors so similarity is meaningful
    /// without a network call.
    struct LetterFrequencyEmbedder;

    #[async_trait]
    impl Embedder for LetterFrequencyEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut v = vec![0.0f32; 26];
            for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
                v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
            }
            Ok(v)
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for t in texts {
                out.push(self.embed(t).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            26
        }
    }

    fn chunk(text: &str) -> ContextChunk {
        ContextChunk {
            text: text.to_string(),
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&a, &[0.0, 1.0, 0.0]).abs() < 0.001);
        assert!((cosine_similarity(&a, &[-1.0, 0.0, 0.0]) + 1.0).abs() < 0.001);
        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_query_returns_most_similar_chunk() {
        let embedder = Arc::new(LetterFrequencyEmbedder);
        let index = ContextIndex::build(
            embedder,
            vec![chunk("aaaa bbbb"), chunk("zzzz yyyy"), chunk("aaa bbb")],
        )
        .await
        .unwrap();

        let results = index.query("aaaa bbbb", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "aaaa bbbb");
    }

    #[tokio::test]
    async fn test_query_respects_k() {
        let embedder = Arc::new(LetterFrequencyEmbedder);
        let index = ContextIndex::build(embedder, vec![chunk("abc"), chunk("abd"), chunk("xyz")])
            .await
            .unwrap();

        let results = index.query("abc", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_index_returns_no_chunks() {
        let index = ContextIndex::build(Arc::new(LetterFrequencyEmbedder), Vec::new())
            .await
            .unwrap();
        assert!(index.is_empty());
        assert!(index.query("anything", 1).await.unwrap().is_empty());
    }
}
