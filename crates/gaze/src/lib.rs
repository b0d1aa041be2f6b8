//! Gaze Estimation
//!
//! Per-frame gaze direction and blink classification from facial landmarks:
//! - Pupil localization from iris landmarks
//! - Eye bounding boxes from fixed extreme landmarks
//! - Horizontal/vertical gaze ratios and blink ratios
//! - Ordered decision table producing a [`GazeState`]
//!
//! Frames are independent; nothing is carried from one frame to the next.

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod eye;
pub mod pupil;
pub mod state;

pub use analysis::FrameAnalysis;
pub use classifier::{classify, Classification, Classifier, EyePair, GazeRatios};
pub use config::GazeConfig;
pub use eye::{eye_bounding_box, EyeBoundingBox};
pub use pupil::pupil_center;
pub use state::{polar_to_offset, GazeState, HorizontalBand, VerticalBand};

pub use face_landmarks::{Eye, FaceLandmarks, LandmarkDetector, PixelPoint};

use face_landmarks::LandmarkError;
use thiserror::Error;
use tracing::debug;
use video_frame::{FrameError, FrameSize, VideoFrame};

/// Gaze error types
#[derive(Error, Debug)]
pub enum GazeError {
    #[error("Landmark detection failed: {0}")]
    Landmarks(#[from] LandmarkError),

    #[error("Invalid frame: {0}")]
    Frame(#[from] FrameError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Runs the landmark detector and the gaze classifier on each frame
pub struct GazeEstimator<D> {
    detector: D,
    classifier: Classifier,
}

impl<D: LandmarkDetector> GazeEstimator<D> {
    /// Create an estimator with configuration
    pub fn new(config: GazeConfig, detector: D) -> Result<Self, GazeError> {
        config.validate()?;
        Ok(Self {
            detector,
            classifier: Classifier::new(config),
        })
    }

    /// Analyze a single frame
    pub fn analyze(&mut self, frame: &VideoFrame) -> Result<FrameAnalysis, GazeError> {
        let face = self.detector.detect(frame)?;
        if face.is_none() {
            debug!(sequence = frame.sequence, "No landmarks detected");
        }
        Ok(self.analyze_landmarks(face.as_ref(), frame.size()))
    }

    /// Classify landmarks already detected elsewhere
    pub fn analyze_landmarks(&self, face: Option<&FaceLandmarks>, size: FrameSize) -> FrameAnalysis {
        let analysis = FrameAnalysis::from_landmarks(face, size, &self.classifier);
        debug!(state = ?analysis.state, ratios = ?analysis.ratios, "Classified frame");
        analysis
    }

    /// Run only the detector, for callers that also draw the landmarks
    pub fn detect(&mut self, frame: &VideoFrame) -> Result<Option<FaceLandmarks>, GazeError> {
        Ok(self.detector.detect(frame)?)
    }

    pub fn config(&self) -> &GazeConfig {
        self.classifier.config()
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_landmarks::{FaceMeshTopology, FixedLandmarks, LandmarkPoint, LandmarkSet};

    fn frame() -> VideoFrame {
        VideoFrame::new(vec![0; 400 * 200 * 3], 400, 200, 0, 7).unwrap()
    }

    /// Left eye box (80,120,70,130) pupil (100,100); right eye box (80,120,270,330) pupil (300,100)
    fn centred_face() -> FaceLandmarks {
        let mut set = LandmarkSet::new(vec![LandmarkPoint::default(); 478]);
        let at = |x: f32, y: f32| LandmarkPoint::new((x + 0.5) / 400.0, (y + 0.5) / 200.0);

        set.set(386, at(100.0, 80.0));
        set.set(374, at(100.0, 120.0));
        set.set(362, at(70.0, 100.0));
        set.set(263, at(130.0, 100.0));
        for index in 474..=477 {
            set.set(index, at(100.0, 100.0));
        }

        set.set(159, at(300.0, 80.0));
        set.set(145, at(300.0, 120.0));
        set.set(33, at(270.0, 100.0));
        set.set(133, at(330.0, 100.0));
        for index in 469..=472 {
            set.set(index, at(300.0, 100.0));
        }

        FaceLandmarks::new(set, &FaceMeshTopology::MEDIAPIPE_REFINED).unwrap()
    }

    #[test]
    fn test_end_to_end_centre() {
        let mut estimator =
            GazeEstimator::new(GazeConfig::default(), FixedLandmarks::new(centred_face())).unwrap();
        let analysis = estimator.analyze(&frame()).unwrap();

        assert!(analysis.face_detected);
        assert_eq!(analysis.left_pupil, Some(PixelPoint::new(100, 100)));
        assert_eq!(analysis.right_pupil, Some(PixelPoint::new(300, 100)));
        assert_eq!(analysis.left_eye_box, Some(EyeBoundingBox::new(80, 120, 70, 130)));
        assert_eq!(analysis.right_eye_box, Some(EyeBoundingBox::new(80, 120, 270, 330)));
        assert_eq!(analysis.state, GazeState::Center);
        assert_eq!(analysis.pupil_text(Eye::Right), "Right pupil: (300, 100)");
    }

    #[test]
    fn test_no_face_is_not_an_error() {
        let mut estimator = GazeEstimator::new(GazeConfig::default(), FixedLandmarks::none()).unwrap();
        let analysis = estimator.analyze(&frame()).unwrap();
        assert!(!analysis.face_detected);
        assert_eq!(analysis.state, GazeState::Undetermined);
        assert!(analysis.ratios.is_none());
        assert_eq!(estimator.detector().calls(), 1);
    }

    #[test]
    fn test_frames_are_independent() {
        let mut estimator =
            GazeEstimator::new(GazeConfig::default(), FixedLandmarks::new(centred_face())).unwrap();
        let first = estimator.analyze(&frame()).unwrap();
        let second = estimator.analyze(&frame()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GazeConfig {
            open_eye_span_px: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            GazeEstimator::new(config, FixedLandmarks::none()),
            Err(GazeError::Config(_))
        ));
    }
}
