//! Pipeline orchestrator for PageChat.
//!
//! Sequences sanitize -> chunk -> index -> retrieve -> compose -> complete ->
//! post-process for both chat modes, and owns the single point where internal
//! failures collapse to the generic safe message. Everything the pipeline
//! touches is request-scoped; the orchestrator itself is built once at
//! startup and shared read-only.

use crate::backend::{AuthService, NewSavedPage, PageStore, RestBackend, SavedPage, UserRecord};
use crate::chunking::split_into_chunks;
use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{PageChatError, Result};
use crate::index::ContextIndex;
use crate::llm::{ChatModel, OpenAiChatModel};
use crate::rag::{
    compose_system_prompt, normalize_history, strip_answer_label, AnswerResult, ChatMode, ChatTurn,
};
use crate::sanitize::{extract_page, sanitize_html};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// Safe message for any internal failure during a chat request.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong please try again later";

/// Sentinel for chat requests with a missing, empty, or rejected token.
pub const NOT_LOGGED_IN_MESSAGE: &str = "You are not logged in";

/// Sentinel for chat requests naming a page the user has not saved.
pub const PAGE_NOT_FOUND_MESSAGE: &str = "Website not found";

/// Source tag for chunks built from request-submitted HTML.
const EXTENSION_SOURCE: &str = "extension";

/// Errors from the save-page and validate flows. Unlike chat, these surface
/// as HTTP error statuses.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Token is required")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Internal server error")]
    Internal(#[source] PageChatError),
}

/// The main orchestrator for the chat and save pipelines.
pub struct Orchestrator {
    settings: Settings,
    embedder: Arc<dyn Embedder>,
    chat_model: Arc<dyn ChatModel>,
    auth: Arc<dyn AuthService>,
    pages: Arc<dyn PageStore>,
}

impl Orchestrator {
    /// Create an orchestrator wired to OpenAI and the hosted backend.
    pub fn new(settings: Settings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.rag.request_timeout_seconds);

        let embedder = Arc::new(OpenAIEmbedder::new(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
            timeout,
        )?);

        let chat_model = Arc::new(OpenAiChatModel::new(
            &settings.rag.model,
            settings.rag.temperature,
            timeout,
        )?);

        let backend = Arc::new(RestBackend::new(&settings.backend)?);

        Ok(Self {
            settings,
            embedder,
            chat_model,
            auth: backend.clone(),
            pages: backend,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        chat_model: Arc<dyn ChatModel>,
        auth: Arc<dyn AuthService>,
        pages: Arc<dyn PageStore>,
    ) -> Self {
        Self {
            settings,
            embedder,
            chat_model,
            auth,
            pages,
        }
    }

    /// Extension-mode chat over HTML submitted with the request.
    ///
    /// Never fails: any internal error is logged and collapsed to the
    /// generic safe message.
    #[instrument(skip(self, html, history))]
    pub async fn chat_extension(
        &self,
        html: &str,
        question: &str,
        history: &[ChatTurn],
    ) -> AnswerResult {
        let outcome = async {
            let text = sanitize_html(html)?;
            self.run_pipeline(ChatMode::Extension, &text, EXTENSION_SOURCE, question, history)
                .await
        }
        .await;

        match outcome {
            Ok(answer) => AnswerResult::new(answer, question),
            Err(e) => {
                error!("Extension chat failed: {e}");
                AnswerResult::new(GENERIC_FAILURE_MESSAGE, question)
            }
        }
    }

    /// App-mode chat over a previously saved page.
    ///
    /// The two precondition checks short-circuit with their sentinel
    /// messages; everything past them collapses to the generic message on
    /// failure. All outcomes are normal `AnswerResult`s.
    #[instrument(skip(self, token, history))]
    pub async fn chat_app(
        &self,
        token: Option<&str>,
        page_id: &str,
        question: &str,
        history: &[ChatTurn],
    ) -> AnswerResult {
        let user = match self.authenticate(token).await {
            Some(user) => user,
            None => return AnswerResult::new(NOT_LOGGED_IN_MESSAGE, question),
        };

        let page = match self.pages.find_page(page_id, &user.id).await {
            Ok(Some(page)) => page,
            Ok(None) => {
                info!("Page {page_id} not found for user {}", user.id);
                return AnswerResult::new(PAGE_NOT_FOUND_MESSAGE, question);
            }
            Err(e) => {
                error!("Page lookup failed: {e}");
                return AnswerResult::new(GENERIC_FAILURE_MESSAGE, question);
            }
        };

        // Stored text was sanitized at save time; it is not re-sanitized.
        let outcome = self
            .run_pipeline(ChatMode::App, &page.html, &page.id, question, history)
            .await;

        match outcome {
            Ok(answer) => AnswerResult::new(answer, question),
            Err(e) => {
                error!("App chat failed: {e}");
                AnswerResult::new(GENERIC_FAILURE_MESSAGE, question)
            }
        }
    }

    /// Sanitize a page and persist it for the authenticated user.
    #[instrument(skip(self, token, html))]
    pub async fn save_page(
        &self,
        token: Option<&str>,
        html: &str,
        url: &str,
    ) -> std::result::Result<SavedPage, SaveError> {
        let user = self.require_user(token).await?;

        let extract = extract_page(html).map_err(SaveError::Internal)?;

        let saved = self
            .pages
            .insert_page(NewSavedPage {
                title: extract.title,
                icon: extract.icon,
                html: extract.text,
                url: url.to_string(),
                user_id: user.id,
            })
            .await
            .map_err(SaveError::Internal)?;

        info!("Saved page {} ({})", saved.id, saved.title);
        Ok(saved)
    }

    /// Resolve a token to its user, with the save-flow error taxonomy.
    pub async fn validate_token(
        &self,
        token: Option<&str>,
    ) -> std::result::Result<UserRecord, SaveError> {
        self.require_user(token).await
    }

    /// Shared chat pipeline: chunk, index, retrieve, compose, complete,
    /// post-process.
    async fn run_pipeline(
        &self,
        mode: ChatMode,
        text: &str,
        source: &str,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<String> {
        let chunks = split_into_chunks(text, source, self.settings.chunking.max_chars);
        info!("Split page text into {} chunks", chunks.len());

        let index = ContextIndex::build(self.embedder.clone(), chunks).await?;
        let retrieved = index.query(question, self.settings.rag.top_k).await?;

        let system_prompt = compose_system_prompt(&self.settings.prompts, mode, &retrieved);
        let pairs = normalize_history(history)?;

        let raw = self
            .chat_model
            .complete(&system_prompt, &pairs, question)
            .await?;

        Ok(strip_answer_label(&raw))
    }

    /// Auth precondition for chat: any missing, empty, or rejected token, and
    /// any auth transport failure, uniformly reads as "not logged in". The
    /// transport case is still logged distinctly.
    async fn authenticate(&self, token: Option<&str>) -> Option<UserRecord> {
        let token = token.filter(|t| !t.is_empty())?;
        match self.auth.validate(token).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Auth service failure treated as not logged in: {e}");
                None
            }
        }
    }

    /// Auth precondition for save/validate, where token problems are client
    /// errors rather than sentinels.
    async fn require_user(
        &self,
        token: Option<&str>,
    ) -> std::result::Result<UserRecord, SaveError> {
        let token = match token.filter(|t| !t.is_empty()) {
            Some(t) => t,
            None => return Err(SaveError::MissingToken),
        };
        match self.auth.validate(token).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(SaveError::InvalidToken),
            Err(e) => Err(SaveError::Internal(e)),
        }
    }
}
