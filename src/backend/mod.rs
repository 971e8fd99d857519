//! Hosted auth/storage backend abstraction.
//!
//! The service persists saved pages and validates user tokens against a
//! hosted backend. Both capabilities are traits so the orchestrator can be
//! exercised without a network. `Ok(None)` from validation means the token
//! was rejected; a transport failure is an `Err`, so the two are
//! distinguishable in the type even though the chat flow collapses both to
//! "not logged in".

mod memory;
mod rest;

pub use memory::MemoryBackend;
pub use rest::RestBackend;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An authenticated user, as returned by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A page persisted by a user. The `html` field holds sanitized text, not
/// markup; pages are sanitized once at save time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPage {
    pub id: String,
    pub title: String,
    pub icon: Option<String>,
    pub html: String,
    pub url: String,
    pub user_id: String,
}

/// Fields for inserting a new saved page.
#[derive(Debug, Clone, Serialize)]
pub struct NewSavedPage {
    pub title: String,
    pub icon: Option<String>,
    pub html: String,
    pub url: String,
    pub user_id: String,
}

/// Token validation against the hosted auth service.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to a user. `Ok(None)` means the token was
    /// rejected; `Err` means the service could not be reached.
    async fn validate(&self, token: &str) -> Result<Option<UserRecord>>;
}

/// Saved-page persistence. Access control is the owner-id equality encoded
/// in the lookup.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Find a page by id, scoped to its owner.
    async fn find_page(&self, page_id: &str, user_id: &str) -> Result<Option<SavedPage>>;

    /// Insert a new page row.
    async fn insert_page(&self, page: NewSavedPage) -> Result<SavedPage>;
}
