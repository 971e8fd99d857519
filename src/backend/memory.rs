//! In-memory backend implementation.
//!
//! Useful for tests and local development without a hosted backend.

use super::{AuthService, NewSavedPage, PageStore, SavedPage, UserRecord};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// In-memory auth + page store.
pub struct MemoryBackend {
    tokens: RwLock<HashMap<String, UserRecord>>,
    pages: RwLock<Vec<SavedPage>>,
    next_id: AtomicU64,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            pages: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a token as belonging to a user.
    pub fn add_token(&self, token: &str, user_id: &str) {
        let mut tokens = self.tokens.write().unwrap();
        tokens.insert(
            token.to_string(),
            UserRecord {
                id: user_id.to_string(),
                email: None,
            },
        );
    }

    /// Number of stored pages.
    pub fn page_count(&self) -> usize {
        self.pages.read().unwrap().len()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthService for MemoryBackend {
    async fn validate(&self, token: &str) -> Result<Option<UserRecord>> {
        let tokens = self.tokens.read().unwrap();
        Ok(tokens.get(token).cloned())
    }
}

#[async_trait]
impl PageStore for MemoryBackend {
    async fn find_page(&self, page_id: &str, user_id: &str) -> Result<Option<SavedPage>> {
        let pages = self.pages.read().unwrap();
        Ok(pages
            .iter()
            .find(|p| p.id == page_id && p.user_id == user_id)
            .cloned())
    }

    async fn insert_page(&self, page: NewSavedPage) -> Result<SavedPage> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let saved = SavedPage {
            id,
            title: page.title,
            icon: page.icon,
            html: page.html,
            url: page.url,
            user_id: page.user_id,
        };
        self.pages.write().unwrap().push(saved.clone());
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_validation() {
        let backend = MemoryBackend::new();
        backend.add_token("tok", "user-1");

        let user = backend.validate("tok").await.unwrap();
        assert_eq!(user.unwrap().id, "user-1");
        assert!(backend.validate("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_page_lookup_is_owner_scoped() {
        let backend = MemoryBackend::new();
        let saved = backend
            .insert_page(NewSavedPage {
                title: "My Page".to_string(),
                icon: None,
                html: "text".to_string(),
                url: "https://x.test".to_string(),
                user_id: "user-1".to_string(),
            })
            .await
            .unwrap();

        assert!(backend
            .find_page(&saved.id, "user-1")
            .await
            .unwrap()
            .is_some());
        // Another user cannot see the page.
        assert!(backend
            .find_page(&saved.id, "user-2")
            .await
            .unwrap()
            .is_none());
    }
}
