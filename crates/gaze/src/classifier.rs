//! Gaze and blink ratios and the decision table mapping them to a state

use face_landmarks::PixelPoint;
use serde::{Deserialize, Serialize};

use crate::config::GazeConfig;
use crate::eye::EyeBoundingBox;
use crate::state::{GazeState, HorizontalBand, VerticalBand};

/// A value for each eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyePair<T> {
    pub left: T,
    pub right: T,
}

impl<T> EyePair<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// Present only when both eyes are
    pub fn both(left: Option<T>, right: Option<T>) -> Option<Self> {
        Some(Self::new(left?, right?))
    }
}

/// Normalized pupil position and eye opening for one frame.
///
/// `horizontal` / `vertical` are absent when an eye box has zero width /
/// height, since the pupil offset cannot be normalized against it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeRatios {
    /// Mean pupil offset from the box's min_x, over box width
    pub horizontal: Option<f64>,
    /// Mean pupil offset from the box's min_y, over box height
    pub vertical: Option<f64>,
    /// Left eye vertical span over the open-eye span
    pub blink_left: f64,
    /// Right eye vertical span over the open-eye span
    pub blink_right: f64,
}

impl GazeRatios {
    pub fn compute(
        pupils: &EyePair<PixelPoint>,
        boxes: &EyePair<EyeBoundingBox>,
        open_eye_span_px: f64,
    ) -> Self {
        let h_left = offset_ratio(pupils.left.x, boxes.left.min_x, boxes.left.width());
        let h_right = offset_ratio(pupils.right.x, boxes.right.min_x, boxes.right.width());
        let v_left = offset_ratio(pupils.left.y, boxes.left.min_y, boxes.left.height());
        let v_right = offset_ratio(pupils.right.y, boxes.right.min_y, boxes.right.height());

        Self {
            horizontal: mean(h_left, h_right),
            vertical: mean(v_left, v_right),
            blink_left: boxes.left.height() as f64 / open_eye_span_px,
            blink_right: boxes.right.height() as f64 / open_eye_span_px,
        }
    }
}

fn offset_ratio(pupil: i32, origin: i32, extent: u32) -> Option<f64> {
    if extent == 0 {
        return None;
    }
    Some((pupil - origin).unsigned_abs() as f64 / extent as f64)
}

fn mean(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some((a? + b?) / 2.0)
}

/// Ratios and the state chosen from them
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Classification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratios: Option<GazeRatios>,
    pub state: GazeState,
}

/// Ordered rule list over gaze ratios
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: GazeConfig,
}

impl Classifier {
    pub fn new(config: GazeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GazeConfig {
        &self.config
    }

    /// Classify one frame's geometry. Missing pupils or boxes give
    /// `Undetermined` with no ratios.
    pub fn classify(
        &self,
        pupils: Option<EyePair<PixelPoint>>,
        boxes: Option<EyePair<EyeBoundingBox>>,
    ) -> Classification {
        let (Some(pupils), Some(boxes)) = (pupils, boxes) else {
            return Classification::default();
        };

        let ratios = GazeRatios::compute(&pupils, &boxes, self.config.open_eye_span_px);
        Classification {
            ratios: Some(ratios),
            state: self.decide(&ratios),
        }
    }

    /// First matching rule wins: left blink, right blink, both blink, then direction
    pub fn decide(&self, ratios: &GazeRatios) -> GazeState {
        if let Some(blink) = self.blink_state(ratios.blink_left, ratios.blink_right) {
            return blink;
        }

        match (ratios.horizontal, ratios.vertical) {
            (Some(horizontal), Some(vertical)) => GazeState::from_bands(
                VerticalBand::classify(vertical, self.config.vertical_band),
                HorizontalBand::classify(horizontal, self.config.horizontal_band),
            ),
            _ => GazeState::Undetermined,
        }
    }

    fn blink_state(&self, left: f64, right: f64) -> Option<GazeState> {
        let closed = |ratio: f64| ratio <= self.config.blink_threshold;

        match (closed(left), closed(right)) {
            (true, false) => Some(GazeState::LeftBlink),
            (false, true) => Some(GazeState::RightBlink),
            (true, true) => Some(GazeState::BothBlink),
            (false, false) => None,
        }
    }
}

/// Classify with the default thresholds
pub fn classify(
    pupils: Option<EyePair<PixelPoint>>,
    boxes: Option<EyePair<EyeBoundingBox>>,
) -> Classification {
    Classifier::default().classify(pupils, boxes)
}
