//! Eye bounding boxes

use face_landmarks::{Eye, FaceMeshTopology, LandmarkSet};
use serde::{Deserialize, Serialize};
use video_frame::FrameSize;

/// Axis-aligned eye box in pixel space.
///
/// Built straight from the topology's extreme landmarks; the fields are not
/// reordered, so with a strongly rotated head `min_*` may exceed `max_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeBoundingBox {
    pub min_y: i32,
    pub max_y: i32,
    pub min_x: i32,
    pub max_x: i32,
}

impl EyeBoundingBox {
    pub fn new(min_y: i32, max_y: i32, min_x: i32, max_x: i32) -> Self {
        Self {
            min_y,
            max_y,
            min_x,
            max_x,
        }
    }

    /// Absolute horizontal extent
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x).unsigned_abs()
    }

    /// Absolute vertical extent
    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y).unsigned_abs()
    }
}

/// Pixel-space bounding box of one eye
pub fn eye_bounding_box(
    landmarks: &LandmarkSet,
    topology: &FaceMeshTopology,
    eye: Eye,
    size: FrameSize,
) -> Option<EyeBoundingBox> {
    let extremes = topology.eye_extremes(eye);

    Some(EyeBoundingBox {
        min_y: landmarks.get(extremes.top)?.pixel_y(size.height),
        max_y: landmarks.get(extremes.bottom)?.pixel_y(size.height),
        min_x: landmarks.get(extremes.left)?.pixel_x(size.width),
        max_x: landmarks.get(extremes.right)?.pixel_x(size.width),
    })
}
