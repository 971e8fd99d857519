//! HTTP API server for the extension and companion app.
//!
//! Chat endpoints always answer HTTP 200 with an `AnswerResult`; "not logged
//! in" and "website not found" are business outcomes carried as sentinel
//! messages, not transport errors. Only the save/validate flows use error
//! statuses.

use crate::config::Settings;
use crate::orchestrator::{Orchestrator, SaveError};
use crate::rag::{AnswerResult, ChatTurn};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Header carrying the app-mode auth token.
const AUTH_TOKEN_HEADER: &str = "x-auth-token";

struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let app = router(orchestrator);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router. Split out so tests can drive it without a socket.
pub fn router(orchestrator: Orchestrator) -> Router {
    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat_extension))
        .route("/app/chat", post(chat_app))
        .route("/app/save", post(save_page))
        .route("/user/validate", post(validate_user))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ExtensionChatRequest {
    user_message: String,
    html: String,
    #[serde(default)]
    history: Vec<ChatTurn>,
}

#[derive(Deserialize)]
struct AppChatRequest {
    /// Saved page id.
    id: String,
    user_message: String,
    /// Echoed by some clients; retrieval uses the stored page text.
    #[serde(default)]
    #[allow(dead_code)]
    url: Option<String>,
    #[serde(default)]
    history: Vec<ChatTurn>,
}

#[derive(Deserialize)]
struct SavePageRequest {
    html: String,
    url: String,
}

#[derive(Deserialize)]
struct ValidateRequest {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn chat_extension(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtensionChatRequest>,
) -> Json<AnswerResult> {
    Json(
        state
            .orchestrator
            .chat_extension(&req.html, &req.user_message, &req.history)
            .await,
    )
}

async fn chat_app(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AppChatRequest>,
) -> Json<AnswerResult> {
    let token = auth_token(&headers);
    Json(
        state
            .orchestrator
            .chat_app(token.as_deref(), &req.id, &req.user_message, &req.history)
            .await,
    )
}

async fn save_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SavePageRequest>,
) -> impl IntoResponse {
    let token = auth_token(&headers);
    match state
        .orchestrator
        .save_page(token.as_deref(), &req.html, &req.url)
        .await
    {
        Ok(_) => (StatusCode::OK, Json(StatusResponse { status: "Success" })).into_response(),
        Err(e) => save_error_response(e),
    }
}

async fn validate_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateRequest>,
) -> impl IntoResponse {
    match state.orchestrator.validate_token(req.token.as_deref()).await {
        Ok(_) => (StatusCode::OK, Json(StatusResponse { status: "success" })).into_response(),
        Err(e) => save_error_response(e),
    }
}

fn auth_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn save_error_response(err: SaveError) -> axum::response::Response {
    let status = match err {
        SaveError::MissingToken | SaveError::InvalidToken => StatusCode::BAD_REQUEST,
        SaveError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            detail: err.to_string(),
        }),
    )
        .into_response()
}
