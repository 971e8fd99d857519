//! PageChat - webpage-grounded conversational question answering.
//!
//! A backend that lets a browser extension and a companion web app chat with
//! the contents of a webpage. Submitted HTML is sanitized, chunked, and
//! embedded into a request-scoped vector index; the most relevant chunk is
//! retrieved for each question and handed to a hosted LLM as grounding
//! context. Authenticated users can also persist scraped pages and chat with
//! them later.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `sanitize` - Markup sanitization and page extraction
//! - `chunking` - Fixed-size text chunking
//! - `embedding` - Embedding generation
//! - `index` - Per-request vector index
//! - `llm` - Chat completion backends
//! - `rag` - Prompt composition, history normalization, answer cleanup
//! - `backend` - Hosted auth/storage services
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use pagechat::config::Settings;
//! use pagechat::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let html = "<html><body><p>The sky is blue.</p></body></html>";
//!     let answer = orchestrator
//!         .chat_extension(html, "What color is the sky?", &[])
//!         .await;
//!     println!("{}", answer.bot_response);
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod sanitize;

pub use error::{PageChatError, Result};
