//! Session Routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::{ApiError, AppState, OverlayOptions};

/// A session and its overlay options
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub options: OverlayOptions,
}

/// Start a session. A missing body uses the default overlays.
pub async fn create_session(
    State(state): State<Arc<RwLock<AppState>>>,
    options: Option<Json<OverlayOptions>>,
) -> (StatusCode, Json<SessionResponse>) {
    let options = options.map(|Json(o)| o).unwrap_or_default();
    let id = state.write().await.sessions.create(options);
    info!("Created session {}", id);
    (StatusCode::CREATED, Json(SessionResponse { id, options }))
}

pub async fn get_session(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let options = state
        .read()
        .await
        .sessions
        .get(&id)
        .ok_or(ApiError::SessionNotFound(id))?;
    Ok(Json(SessionResponse { id, options }))
}

/// Replace a session's overlay options
pub async fn update_session(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(id): Path<Uuid>,
    Json(options): Json<OverlayOptions>,
) -> Result<Json<SessionResponse>, ApiError> {
    let options = state
        .write()
        .await
        .sessions
        .update(&id, options)
        .ok_or(ApiError::SessionNotFound(id))?;
    Ok(Json(SessionResponse { id, options }))
}

pub async fn delete_session(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .write()
        .await
        .sessions
        .remove(&id)
        .ok_or(ApiError::SessionNotFound(id))?;
    info!("Closed session {}", id);
    Ok(StatusCode::NO_CONTENT)
}
