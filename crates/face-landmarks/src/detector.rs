//! Landmark detectors

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb};
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use video_frame::VideoFrame;

use crate::topology::FaceMeshTopology;
use crate::types::{FaceLandmarks, LandmarkPoint, LandmarkSet};
use crate::{LandmarkDetector, LandmarkError};

/// Landmark detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Face mesh ONNX model (NHWC float input in [0, 1], landmarks in input pixels)
    pub model_path: Option<String>,

    /// Square model input size (pixels)
    pub input_size: u32,

    /// Minimum face presence score
    pub min_detection_confidence: f32,

    /// Maximum number of faces reported per frame
    pub max_faces: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            input_size: 192,
            min_detection_confidence: 0.5,
            max_faces: 1,
        }
    }
}

/// Face mesh with iris refinement running on ONNX Runtime
pub struct OnnxFaceMesh {
    session: Session,
    input_size: u32,
    min_confidence: f32,
    topology: &'static FaceMeshTopology,
}

impl OnnxFaceMesh {
    pub fn new(config: &DetectorConfig) -> Result<Self, LandmarkError> {
        let path = config
            .model_path
            .as_deref()
            .ok_or_else(|| LandmarkError::Config("no face mesh model path configured".into()))?;

        if config.max_faces != 1 {
            return Err(LandmarkError::Config(format!(
                "face mesh tracks exactly one face, got max_faces = {}",
                config.max_faces
            )));
        }
        if config.input_size == 0 {
            return Err(LandmarkError::Config("input_size must be positive".into()));
        }

        info!("Loading face mesh model from {}", path);
        let session = Session::builder()
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.commit_from_file(path))
            .map_err(|e| {
                error!("Failed to load face mesh model: {}", e);
                LandmarkError::ModelLoad(e.to_string())
            })?;

        Ok(Self {
            session,
            input_size: config.input_size,
            min_confidence: config.min_detection_confidence,
            topology: &FaceMeshTopology::MEDIAPIPE_REFINED,
        })
    }

    fn preprocess(&self, frame: &VideoFrame) -> Result<Array4<f32>, LandmarkError> {
        let img = ImageBuffer::<Rgb<u8>, _>::from_raw(frame.width, frame.height, frame.data.as_slice())
            .ok_or_else(|| LandmarkError::ImageProcessing("Failed to create image buffer".into()))?;

        let size = self.input_size;
        let resized = imageops::resize(&img, size, size, FilterType::Triangle);

        let mut input = Array4::<f32>::zeros((1, size as usize, size as usize, 3));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for channel in 0..3 {
                input[[0, y as usize, x as usize, channel]] = pixel[channel] as f32 / 255.0;
            }
        }
        Ok(input)
    }
}

impl LandmarkDetector for OnnxFaceMesh {
    fn name(&self) -> &str {
        "onnx-face-mesh"
    }

    fn detect(&mut self, frame: &VideoFrame) -> Result<Option<FaceLandmarks>, LandmarkError> {
        let input = self.preprocess(frame)?;

        let outputs = self
            .session
            .run(ort::inputs![input].map_err(|e| LandmarkError::Inference(e.to_string()))?)
            .map_err(|e| LandmarkError::Inference(e.to_string()))?;

        // Face presence logit, when the model exports one
        if outputs.len() > 1 {
            let score = outputs[1]
                .try_extract_tensor::<f32>()
                .map_err(|e| LandmarkError::Inference(e.to_string()))?
                .iter()
                .next()
                .copied()
                .map(sigmoid)
                .unwrap_or(0.0);

            if score < self.min_confidence {
                debug!("No landmarks detected (face score {:.3})", score);
                return Ok(None);
            }
        }

        let raw: Vec<f32> = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| LandmarkError::Inference(e.to_string()))?
            .iter()
            .copied()
            .collect();

        let points = decode_landmarks(&raw, self.input_size)?;
        FaceLandmarks::new(points, self.topology).map(Some)
    }
}

/// Convert flattened (x, y, z) triples in model input pixels to normalized landmarks
fn decode_landmarks(raw: &[f32], input_size: u32) -> Result<LandmarkSet, LandmarkError> {
    if raw.is_empty() || raw.len() % 3 != 0 {
        return Err(LandmarkError::Inference(format!(
            "landmark tensor length {} is not a multiple of 3",
            raw.len()
        )));
    }

    let scale = input_size as f32;
    let points = raw
        .chunks_exact(3)
        .map(|p| LandmarkPoint::with_depth(p[0] / scale, p[1] / scale, p[2] / scale))
        .collect();
    Ok(LandmarkSet::new(points))
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Detector returning the same result for every frame.
///
/// Replays recorded landmarks and stands in for the model in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedLandmarks {
    face: Option<FaceLandmarks>,
    calls: usize,
}

impl FixedLandmarks {
    pub fn new(face: FaceLandmarks) -> Self {
        Self {
            face: Some(face),
            calls: 0,
        }
    }

    /// A detector that never finds a face
    pub fn none() -> Self {
        Self::default()
    }

    /// Number of frames this detector has seen
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl LandmarkDetector for FixedLandmarks {
    fn name(&self) -> &str {
        "fixed"
    }

    fn detect(&mut self, _frame: &VideoFrame) -> Result<Option<FaceLandmarks>, LandmarkError> {
        self.calls += 1;
        if self.face.is_none() {
            debug!("No landmarks detected");
        }
        Ok(self.face.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> VideoFrame {
        VideoFrame::new(vec![0; 4 * 4 * 3], 4, 4, 0, 0).unwrap()
    }

    #[test]
    fn test_decode_landmarks_normalizes() {
        let set = decode_landmarks(&[96.0, 48.0, 19.2, 0.0, 192.0, 0.0], 192).unwrap();
        assert_eq!(set.len(), 2);
        let first = set.get(0).unwrap();
        assert!((first.x - 0.5).abs() < 1e-6);
        assert!((first.y - 0.25).abs() < 1e-6);
        assert!((first.z.unwrap() - 0.1).abs() < 1e-6);
        assert!((set.get(1).unwrap().y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_landmarks_rejects_ragged_tensor() {
        assert!(matches!(
            decode_landmarks(&[1.0, 2.0], 192),
            Err(LandmarkError::Inference(_))
        ));
    }

    #[test]
    fn test_missing_model_path_is_config_error() {
        let result = OnnxFaceMesh::new(&DetectorConfig::default());
        assert!(matches!(result, Err(LandmarkError::Config(_))));
    }

    #[test]
    fn test_multi_face_rejected() {
        let config = DetectorConfig {
            model_path: Some("face_mesh.onnx".into()),
            max_faces: 2,
            ..Default::default()
        };
        assert!(matches!(OnnxFaceMesh::new(&config), Err(LandmarkError::Config(_))));
    }

    #[test]
    fn test_fixed_none_reports_absence() {
        let mut detector = FixedLandmarks::none();
        assert!(detector.detect(&frame()).unwrap().is_none());
        assert_eq!(detector.calls(), 1);
    }

    #[test]
    fn test_fixed_returns_face_every_frame() {
        let set = LandmarkSet::new(vec![LandmarkPoint::new(0.5, 0.5); 478]);
        let face = FaceLandmarks::new(set, &FaceMeshTopology::MEDIAPIPE_REFINED).unwrap();
        let mut detector = FixedLandmarks::new(face);
        for _ in 0..3 {
            let found = detector.detect(&frame()).unwrap().unwrap();
            assert_eq!(found.landmarks().len(), 478);
        }
        assert_eq!(detector.calls(), 3);
    }

    #[test]
    fn test_sigmoid_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
    }
}
