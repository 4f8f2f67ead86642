use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::application::RunChatbotUseCase;
use crate::domain::DomainError;

use super::payloads::{ChatRequest, ChatResponse, ErrorBody};

pub const CHAT_ROUTE: &str = "/api/chat";
pub const INDEX_FILE: &str = "index.html";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

#[derive(Clone)]
pub struct ChatServerState {
    chatbot: Arc<RunChatbotUseCase>,
}

impl ChatServerState {
    pub fn new(chatbot: Arc<RunChatbotUseCase>) -> Self {
        Self { chatbot }
    }
}

/// Failure surfaced by the chat endpoint. Only invalid input is described to
/// the caller; everything else becomes the generic 500 body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(reason) => ApiError::BadRequest(reason),
            other => {
                error!("Error in chat API: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR_MESSAGE.to_string(),
            ),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

async fn chat(
    State(state): State<ChatServerState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let reply = state
        .chatbot
        .execute(&request.message, request.session_id.as_deref())
        .await?;

    let (message, session_id) = reply.into_parts();
    Ok(Json(ChatResponse {
        message,
        session_id: session_id.into_string(),
    }))
}

/// Chat API plus the static chat page. Any path that is neither the API nor
/// an existing file under `static_dir` is answered with `index.html`.
pub fn build_router(chatbot: Arc<RunChatbotUseCase>, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();
    let assets =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join(INDEX_FILE)));

    Router::new()
        .route(CHAT_ROUTE, post(chat))
        .fallback_service(assets)
        .with_state(ChatServerState::new(chatbot))
        .layer(TraceLayer::new_for_http())
}

/// Serves `router` until Ctrl-C.
pub async fn serve(router: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
