// src/catalog/server.rs
//! # Catalog HTTP Server
//!
//! On-demand realization of the catalog provider, built with Axum.
//!
//! ## Endpoints
//!
//! | Path | Description |
//! |------|-------------|
//! | `/api/audio?type=<kind>` | JSON array of `{id, name, url}` for `music` or `binaural` |
//! | `/*` | Static files below the library root (audio files, `audio-list.json`) |
//!
//! A missing kind directory is created and reported as an empty list.

use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use super::{
    scanner::{scan_kind, MissingDir},
    track::ChannelKind,
};

/// Shared state passed to all request handlers.
#[derive(Clone)]
pub struct ServerState {
    /// Library root holding `audio/<kind>/`.
    pub root: PathBuf,
}

/// Query string of `/api/audio`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Build the router for a library rooted at `root`.
pub fn router(root: PathBuf) -> Router {
    let state = ServerState { root: root.clone() };

    Router::new()
        .route("/api/audio", get(list_tracks))
        .fallback_service(ServeDir::new(root))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve the library until the process ends.
pub async fn serve(root: PathBuf, addr: &str) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("invalid listen address `{addr}`"))?;
    let app = router(root.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, root = %root.display(), "catalog server listening");

    axum::serve(listener, app)
        .await
        .context("catalog server terminated unexpectedly")
}

/// Handles `GET /api/audio`.
///
/// `400` for a missing or unknown `type`, `500` when the directory cannot be read.
pub async fn list_tracks(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let Some(kind) = query
        .kind
        .as_deref()
        .and_then(|k| k.parse::<ChannelKind>().ok())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid type parameter" })),
        )
            .into_response();
    };

    let root = state.root.clone();
    let scanned =
        tokio::task::spawn_blocking(move || scan_kind(&root, kind, MissingDir::Create)).await;

    match scanned {
        Ok(Ok(tracks)) => Json(tracks).into_response(),
        Ok(Err(err)) => {
            error!(%kind, "error reading audio directory: {err}");
            read_failure()
        }
        Err(err) => {
            error!(%kind, "audio directory scan panicked: {err}");
            read_failure()
        }
    }
}

fn read_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to read audio files" })),
    )
        .into_response()
}
