//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gaze::GazeError;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;
use video_frame::FrameError;

/// Errors surfaced by the front-ends
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Gaze estimation failed: {0}")]
    Gaze(#[from] GazeError),

    #[error("Invalid frame: {0}")]
    Frame(#[from] FrameError),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Frame(_) | ApiError::Gaze(GazeError::Frame(_)) | ApiError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let bad = ApiError::Frame(FrameError::Decode("garbage".into()));
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let missing = ApiError::SessionNotFound(Uuid::nil());
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let failed = ApiError::Gaze(GazeError::Config("bad".into()));
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
