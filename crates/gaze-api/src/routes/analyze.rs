//! Frame Analysis Routes

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use face_landmarks::FaceLandmarks;
use gaze::FrameAnalysis;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;
use video_frame::{encode_jpeg, VideoFrame};

use crate::{render, ApiError, AppState, OverlayOptions};

/// Header carrying the gaze label on annotated frames
pub const GAZE_STATE_HEADER: &str = "x-gaze-state";

/// Response for the analyze endpoint
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Human-readable state, e.g. "Looking top left"
    pub label: &'static str,
    #[serde(flatten)]
    pub analysis: FrameAnalysis,
}

/// Query parameters for the annotate endpoint
#[derive(Debug, Deserialize)]
pub struct AnnotateQuery {
    /// Session whose overlay options apply (defaults otherwise)
    pub session: Option<Uuid>,
}

fn decode(body: &[u8], sequence: u64) -> Result<VideoFrame, ApiError> {
    if body.is_empty() {
        return Err(ApiError::InvalidInput("empty request body".to_string()));
    }
    let mut frame = VideoFrame::decode(body)?;
    frame.sequence = sequence as u32;
    Ok(frame)
}

/// Detect once, classify, and record metrics
fn process(
    state: &mut AppState,
    frame: &VideoFrame,
) -> Result<(Option<FaceLandmarks>, FrameAnalysis), ApiError> {
    let started = Instant::now();
    let face = state.estimator.detect(frame)?;
    let analysis = state.estimator.analyze_landmarks(face.as_ref(), frame.size());

    histogram!("gaze_analysis_seconds").record(started.elapsed().as_secs_f64());
    counter!("gaze_frames_total", "state" => analysis.state.name()).increment(1);
    if !analysis.face_detected {
        counter!("gaze_frames_no_face_total").increment(1);
    }
    state.frames_analyzed += 1;

    Ok((face, analysis))
}

/// Analyze an encoded frame
pub async fn analyze(
    State(state): State<Arc<RwLock<AppState>>>,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut state = state.write().await;
    let frame = decode(&body, state.frames_analyzed)?;
    let (_, analysis) = process(&mut state, &frame)?;

    Ok(Json(AnalyzeResponse {
        label: analysis.state.label(),
        analysis,
    }))
}

/// Analyze an encoded frame and return it annotated as JPEG
pub async fn annotate(
    State(state): State<Arc<RwLock<AppState>>>,
    Query(params): Query<AnnotateQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let mut state = state.write().await;
    let options = match params.session {
        Some(id) => state.sessions.get(&id).ok_or(ApiError::SessionNotFound(id))?,
        None => OverlayOptions::default(),
    };

    let frame = decode(&body, state.frames_analyzed)?;
    let (face, analysis) = process(&mut state, &frame)?;
    drop(state);

    let image = render::annotate(&frame, face.as_ref(), &analysis, &options)?;
    let jpeg = encode_jpeg(&image)?;
    debug!(bytes = jpeg.len(), state = ?analysis.state, "Annotated frame");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/jpeg")),
            (
                header::HeaderName::from_static(GAZE_STATE_HEADER),
                HeaderValue::from_static(analysis.state.label()),
            ),
        ],
        jpeg,
    )
        .into_response())
}
