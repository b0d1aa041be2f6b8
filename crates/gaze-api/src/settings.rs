//! Front-end settings and detector selection

use std::fs;

use ::config::{Config, Environment, File};
use face_landmarks::{
    DetectorConfig, FaceLandmarks, FaceMeshTopology, FixedLandmarks, LandmarkDetector, LandmarkSet,
    OnnxFaceMesh,
};
use gaze::GazeConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ApiError;

/// Detector shared by the front-ends
pub type BoxedDetector = Box<dyn LandmarkDetector + Send + Sync>;

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Listen address
    pub addr: String,
    /// Largest accepted encoded frame (bytes)
    pub max_frame_bytes: usize,
    /// Expose Prometheus metrics at /metrics
    pub enable_metrics: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            max_frame_bytes: 8 * 1024 * 1024,
            enable_metrics: true,
        }
    }
}

/// All front-end settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub detector: DetectorConfig,
    pub gaze: GazeConfig,
    /// Landmark set (JSON array of points) replayed for every frame instead of a model
    pub replay_landmarks: Option<String>,
}

impl Settings {
    /// Load from `path` (or an optional `gaze.toml`) and `GAZE__*` environment variables
    pub fn load(path: Option<&str>) -> Result<Self, ApiError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("gaze").required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("GAZE").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Build the configured landmark detector
    pub fn build_detector(&self) -> Result<BoxedDetector, ApiError> {
        if self.detector.model_path.is_some() {
            return Ok(Box::new(OnnxFaceMesh::new(&self.detector).map_err(gaze::GazeError::from)?));
        }

        if let Some(path) = &self.replay_landmarks {
            info!("Replaying landmarks from {}", path);
            return Ok(Box::new(FixedLandmarks::new(load_landmarks(path)?)));
        }

        warn!("No face mesh model configured. Every frame will report no face.");
        Ok(Box::new(FixedLandmarks::none()))
    }
}

/// Read a recorded landmark set
pub fn load_landmarks(path: &str) -> Result<FaceLandmarks, ApiError> {
    let content = fs::read_to_string(path)?;
    let set: LandmarkSet = serde_json::from_str(&content)
        .map_err(|e| ApiError::InvalidInput(format!("{path}: {e}")))?;
    FaceLandmarks::new(set, &FaceMeshTopology::MEDIAPIPE_REFINED)
        .map_err(|e| ApiError::Gaze(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.addr, "0.0.0.0:8080");
        assert_eq!(settings.detector.max_faces, 1);
        assert_eq!(settings.gaze, GazeConfig::default());
        assert!(settings.replay_landmarks.is_none());
    }

    #[test]
    fn test_without_model_reports_no_face() {
        let mut detector = Settings::default().build_detector().unwrap();
        let frame = video_frame::VideoFrame::new(vec![0; 12], 2, 2, 0, 0).unwrap();
        assert!(detector.detect(&frame).unwrap().is_none());
        assert_eq!(detector.name(), "fixed");
    }

    #[test]
    fn test_missing_replay_file() {
        let settings = Settings {
            replay_landmarks: Some("/nonexistent/landmarks.json".into()),
            ..Default::default()
        };
        assert!(matches!(settings.build_detector(), Err(ApiError::Io(_))));
    }
}
