//! Landmark data model

use serde::{Deserialize, Serialize};
use video_frame::FrameSize;

use crate::topology::FaceMeshTopology;
use crate::LandmarkError;

/// Normalized landmark (x, y in [0, 1] relative to frame width/height)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    /// Relative depth, when the detector provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Pixel column, truncated toward zero
    pub fn pixel_x(&self, width: u32) -> i32 {
        (self.x as f64 * width as f64) as i32
    }

    /// Pixel row, truncated toward zero
    pub fn pixel_y(&self, height: u32) -> i32 {
        (self.y as f64 * height as f64) as i32
    }

    /// Denormalize into frame pixel space
    pub fn to_pixel(&self, size: FrameSize) -> PixelPoint {
        PixelPoint::new(self.pixel_x(size.width), self.pixel_y(size.height))
    }
}

/// Integer point in frame pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Ordered landmarks for one face, indexable by detector position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<LandmarkPoint>,
}

impl LandmarkSet {
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LandmarkPoint> {
        self.points.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LandmarkPoint> {
        self.points.iter()
    }

    /// Overwrite one landmark; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, point: LandmarkPoint) {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = point;
        }
    }
}

/// Named set of landmark edges forming one facial feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexGroup {
    pub name: &'static str,
    pub edges: &'static [(usize, usize)],
}

impl IndexGroup {
    /// Edge at a position in the detector's enumeration order
    pub fn edge(&self, position: usize) -> Option<(usize, usize)> {
        self.edges.get(position).copied()
    }

    /// Largest landmark index referenced by the group
    pub fn max_index(&self) -> usize {
        self.edges
            .iter()
            .map(|&(a, b)| a.max(b))
            .max()
            .unwrap_or(0)
    }
}

/// Detector output for one face: landmarks plus the topology naming them
#[derive(Debug, Clone)]
pub struct FaceLandmarks {
    landmarks: LandmarkSet,
    topology: &'static FaceMeshTopology,
}

impl FaceLandmarks {
    /// Pair a landmark set with its topology, checking every named index is present
    pub fn new(
        landmarks: LandmarkSet,
        topology: &'static FaceMeshTopology,
    ) -> Result<Self, LandmarkError> {
        if landmarks.len() < topology.landmark_count {
            return Err(LandmarkError::LandmarkCount {
                expected: topology.landmark_count,
                actual: landmarks.len(),
            });
        }
        Ok(Self {
            landmarks,
            topology,
        })
    }

    pub fn landmarks(&self) -> &LandmarkSet {
        &self.landmarks
    }

    pub fn topology(&self) -> &'static FaceMeshTopology {
        self.topology
    }

    pub fn iris(&self) -> &IndexGroup {
        &self.topology.iris
    }

    pub fn left_eye(&self) -> &IndexGroup {
        &self.topology.left_eye
    }

    pub fn right_eye(&self) -> &IndexGroup {
        &self.topology.right_eye
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denormalize_truncates() {
        let point = LandmarkPoint::new(0.5049, 0.2599);
        assert_eq!(point.to_pixel(FrameSize::new(200, 100)), PixelPoint::new(100, 25));
    }

    #[test]
    fn test_denormalize_negative_truncates_toward_zero() {
        let point = LandmarkPoint::new(-0.004, 1.0);
        assert_eq!(point.to_pixel(FrameSize::new(100, 50)), PixelPoint::new(0, 50));
    }

    #[test]
    fn test_index_group_max_index() {
        let group = IndexGroup {
            name: "probe",
            edges: &[(3, 9), (12, 1)],
        };
        assert_eq!(group.max_index(), 12);
        assert_eq!(group.edge(1), Some((12, 1)));
        assert_eq!(group.edge(2), None);
    }

    #[test]
    fn test_face_landmarks_rejects_short_set() {
        let set = LandmarkSet::new(vec![LandmarkPoint::default(); 468]);
        let err = FaceLandmarks::new(set, &FaceMeshTopology::MEDIAPIPE_REFINED).unwrap_err();
        assert!(matches!(
            err,
            LandmarkError::LandmarkCount { expected: 478, actual: 468 }
        ));
    }

    #[test]
    fn test_landmark_set_serializes_as_array() {
        let set = LandmarkSet::new(vec![LandmarkPoint::new(0.25, 0.5)]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"[{"x":0.25,"y":0.5}]"#);
        let back: LandmarkSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
