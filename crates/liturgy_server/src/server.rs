//! HTTP server setup and the document endpoint.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use liturgy_docs::{DOCX_MIME, generate_liturgy_docx, payload};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Read-only state shared by every request.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
}

pub type SharedState = Arc<AppState>;

/// Document endpoint. Served on every path; the method decides the outcome.
async fn generate(
    State(state): State<SharedState>,
    method: Method,
    body: Bytes,
) -> Result<Response, ApiError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }
    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected undecodable body: {e}");
        ApiError::undecodable(e)
    })?;
    let request = payload::validate(&value).inspect_err(|e| warn!("Rejected request: {e}"))?;
    let filename = request.attachment_name(&state.config.default_filename);

    let render_state = Arc::clone(&state);
    let bytes = tokio::task::spawn_blocking(move || {
        generate_liturgy_docx(&request, &render_state.config.style)
    })
    .await
    .map_err(|e| ApiError::Generation(e.to_string()))?
    .inspect_err(|e| error!("Document generation failed: {e}"))?;

    let disposition = HeaderValue::from_bytes(
        format!("attachment; filename=\"{filename}\"").as_bytes(),
    )
    .map_err(|e| ApiError::Generation(e.to_string()))?;

    info!(%filename, bytes = bytes.len(), "Sending document");
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(DOCX_MIME)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Build the axum router
pub fn build_router(state: SharedState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .fallback(generate)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Run the server until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.listen_addr;
    let router = build_router(Arc::new(AppState { config }));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Liturgy server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
