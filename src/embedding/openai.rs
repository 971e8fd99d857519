//! OpenAI embeddings implementation.

use super::Embedder;
use crate::error::{PageChatError, Result};
use crate::openai::{create_client, is_transient};
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create a new OpenAI embedder.
    pub fn new(model: &str, dimensions: usize, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client(timeout)?,
            model: model.to_string(),
            dimensions,
        })
    }

    async fn request_embeddings(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(input))
            .dimensions(self.dimensions as u32)
            .build()
            .map_err(|e| PageChatError::Embedding(format!("Failed to build request: {e}")))?;

        // One bounded retry on transient transport failure.
        let response = match self.client.embeddings().create(request.clone()).await {
            Ok(response) => response,
            Err(e) if is_transient(&e) => {
                warn!("Transient embedding failure, retrying once: {e}");
                self.client
                    .embeddings()
                    .create(request)
                    .await
                    .map_err(|e| PageChatError::OpenAI(format!("Embedding API error: {e}")))?
            }
            Err(e) => return Err(PageChatError::OpenAI(format!("Embedding API error: {e}"))),
        };

        // Sort by index to ensure input order.
        let mut embeddings: Vec<_> = response.data.into_iter().collect();
        embeddings.sort_by_key(|e| e.index);

        Ok(embeddings.into_iter().map(|e| e.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| PageChatError::Embedding("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        // OpenAI limits batch size, process in chunks.
        const BATCH_SIZE: usize = 100;
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            all_embeddings.extend(self.request_embeddings(batch.to_vec()).await?);
        }

        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder =
            OpenAIEmbedder::new("text-embedding-3-small", 1536, Duration::from_secs(30)).unwrap();
        assert_eq!(embedder.dimensions(), 1536);
    }
}
