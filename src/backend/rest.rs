//! REST client for the hosted auth/storage backend.
//!
//! Speaks the Supabase-style API the companion app uses: a `/auth/v1/user`
//! endpoint that resolves bearer tokens and a `/rest/v1/pages` rows endpoint
//! filtered with `column=eq.value` query parameters. Constructed once at
//! startup and shared read-only.

use super::{AuthService, NewSavedPage, PageStore, SavedPage, UserRecord};
use crate::config::BackendSettings;
use crate::error::{PageChatError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

const BACKEND_TIMEOUT_SECS: u64 = 15;

/// Client for the hosted backend.
pub struct RestBackend {
    http: reqwest::Client,
    base_url: Url,
    service_key: String,
}

impl RestBackend {
    /// Build a client from backend settings.
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.url)
            .map_err(|e| PageChatError::Config(format!("Invalid backend url: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(BACKEND_TIMEOUT_SECS))
            .build()
            .map_err(|e| PageChatError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            service_key: settings.resolved_key(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PageChatError::Config(format!("Invalid backend path {path:?}: {e}")))
    }
}

#[async_trait]
impl AuthService for RestBackend {
    async fn validate(&self, token: &str) -> Result<Option<UserRecord>> {
        let response = self
            .http
            .get(self.endpoint("/auth/v1/user")?)
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PageChatError::Auth(format!("Auth service unreachable: {e}")))?;

        match response.status() {
            StatusCode::OK => {
                let user: UserRecord = response
                    .json()
                    .await
                    .map_err(|e| PageChatError::Auth(format!("Bad auth response: {e}")))?;
                Ok(Some(user))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("Token rejected by auth service");
                Ok(None)
            }
            status => Err(PageChatError::Auth(format!(
                "Auth service returned {status}"
            ))),
        }
    }
}

#[async_trait]
impl PageStore for RestBackend {
    async fn find_page(&self, page_id: &str, user_id: &str) -> Result<Option<SavedPage>> {
        let response = self
            .http
            .get(self.endpoint("/rest/v1/pages")?)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(&[
                ("id", format!("eq.{page_id}")),
                ("user_id", format!("eq.{user_id}")),
                ("select", "*".to_string()),
            ])
            .send()
            .await
            .map_err(|e| PageChatError::PageStore(format!("Page store unreachable: {e}")))?
            .error_for_status()
            .map_err(|e| PageChatError::PageStore(format!("Page lookup failed: {e}")))?;

        let rows: Vec<SavedPage> = response
            .json()
            .await
            .map_err(|e| PageChatError::PageStore(format!("Bad page row: {e}")))?;

        Ok(rows.into_iter().next())
    }

    async fn insert_page(&self, page: NewSavedPage) -> Result<SavedPage> {
        let response = self
            .http
            .post(self.endpoint("/rest/v1/pages")?)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=representation")
            .json(&page)
            .send()
            .await
            .map_err(|e| PageChatError::PageStore(format!("Page store unreachable: {e}")))?
            .error_for_status()
            .map_err(|e| PageChatError::PageStore(format!("Page insert failed: {e}")))?;

        let rows: Vec<SavedPage> = response
            .json()
            .await
            .map_err(|e| PageChatError::PageStore(format!("Bad insert response: {e}")))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| PageChatError::PageStore("Insert returned no row".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        let settings = BackendSettings {
            url: "not a url".to_string(),
            service_key: String::new(),
        };
        assert!(RestBackend::new(&settings).is_err());
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let settings = BackendSettings {
            url: "https://backend.test".to_string(),
            service_key: "key".to_string(),
        };
        let backend = RestBackend::new(&settings).unwrap();
        assert_eq!(
            backend.endpoint("/auth/v1/user").unwrap().as_str(),
            "https://backend.test/auth/v1/user"
        );
    }
}
