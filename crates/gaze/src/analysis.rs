//! Per-frame gaze analysis results

use face_landmarks::{Eye, FaceLandmarks, PixelPoint};
use serde::{Deserialize, Serialize};
use video_frame::FrameSize;

use crate::classifier::{Classification, Classifier, EyePair, GazeRatios};
use crate::eye::{eye_bounding_box, EyeBoundingBox};
use crate::pupil::pupil_center;
use crate::state::GazeState;

/// Complete gaze analysis of one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Whether the detector found a face
    pub face_detected: bool,

    /// Frame the geometry was denormalized against
    pub frame_size: FrameSize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_pupil: Option<PixelPoint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_pupil: Option<PixelPoint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_eye_box: Option<EyeBoundingBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_eye_box: Option<EyeBoundingBox>,

    /// Gaze and blink ratios (absent without a face)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratios: Option<GazeRatios>,

    /// Classified gaze state
    pub state: GazeState,
}

impl FrameAnalysis {
    /// Result for a frame without a face
    pub fn no_face(frame_size: FrameSize) -> Self {
        Self {
            face_detected: false,
            frame_size,
            left_pupil: None,
            right_pupil: None,
            left_eye_box: None,
            right_eye_box: None,
            ratios: None,
            state: GazeState::Undetermined,
        }
    }

    /// Locate pupils and eye boxes, then classify
    pub fn from_landmarks(
        face: Option<&FaceLandmarks>,
        frame_size: FrameSize,
        classifier: &Classifier,
    ) -> Self {
        let Some(face) = face else {
            return Self::no_face(frame_size);
        };

        let landmarks = face.landmarks();
        let topology = face.topology();
        let pupil = |eye| pupil_center(landmarks, topology, eye, frame_size);
        let eye_box = |eye| eye_bounding_box(landmarks, topology, eye, frame_size);

        let left_pupil = pupil(Eye::Left);
        let right_pupil = pupil(Eye::Right);
        let left_eye_box = eye_box(Eye::Left);
        let right_eye_box = eye_box(Eye::Right);

        let Classification { ratios, state } = classifier.classify(
            EyePair::both(left_pupil, right_pupil),
            EyePair::both(left_eye_box, right_eye_box),
        );

        Self {
            face_detected: true,
            frame_size,
            left_pupil,
            right_pupil,
            left_eye_box,
            right_eye_box,
            ratios,
            state,
        }
    }

    pub fn pupil(&self, eye: Eye) -> Option<PixelPoint> {
        match eye {
            Eye::Left => self.left_pupil,
            Eye::Right => self.right_pupil,
        }
    }

    pub fn eye_box(&self, eye: Eye) -> Option<EyeBoundingBox> {
        match eye {
            Eye::Left => self.left_eye_box,
            Eye::Right => self.right_eye_box,
        }
    }

    /// Pupil text as shown next to the frame, e.g. "Left pupil: (100, 100)"
    pub fn pupil_text(&self, eye: Eye) -> String {
        let name = match eye {
            Eye::Left => "Left pupil",
            Eye::Right => "Right pupil",
        };
        match (self.left_pupil, self.right_pupil, self.pupil(eye)) {
            (Some(_), Some(_), Some(p)) => format!("{name}: ({}, {})", p.x, p.y),
            _ => format!("{name}: ( , )"),
        }
    }
}
