//! Facial Landmark Adapter
//!
//! Wraps an external single-face landmark detector:
//! - Normalized landmark points and fixed-length landmark sets
//! - Versioned topology tables (iris, eye outlines, eye extremes)
//! - ONNX Runtime face mesh detector
//! - Fixed-result detector for replays and tests
//!
//! A frame without a face is `Ok(None)`, never an error.

pub mod detector;
pub mod topology;
pub mod types;

pub use detector::{DetectorConfig, FixedLandmarks, OnnxFaceMesh};
pub use topology::{Eye, EyeExtremes, FaceMeshTopology, PupilSlots};
pub use types::{FaceLandmarks, IndexGroup, LandmarkPoint, LandmarkSet, PixelPoint};

use thiserror::Error;
use video_frame::VideoFrame;

/// Landmark adapter error types
#[derive(Error, Debug)]
pub enum LandmarkError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Expected {expected} landmarks, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },
}

/// A detector producing landmarks for at most one face per frame
pub trait LandmarkDetector {
    /// Human readable detector name
    fn name(&self) -> &str;

    /// Detect landmarks in one frame. `Ok(None)` means no face was found.
    fn detect(&mut self, frame: &VideoFrame) -> Result<Option<FaceLandmarks>, LandmarkError>;
}

impl<D: LandmarkDetector + ?Sized> LandmarkDetector for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn detect(&mut self, frame: &VideoFrame) -> Result<Option<FaceLandmarks>, LandmarkError> {
        (**self).detect(frame)
    }
}
