//! Face mesh topology tables
//!
//! Landmark numbering is owned by the detector. Everything that refers to a
//! landmark by position goes through a [`FaceMeshTopology`], so a detector
//! with a different numbering only has to ship a different table.

use serde::{Deserialize, Serialize};

use crate::types::IndexGroup;

/// Which of the subject's eyes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];
}

/// Positions into the iris group that make up one pupil.
///
/// Each iris edge contributes the x coordinate of one cardinal point and the
/// y coordinate of another, following the detector's enumeration of the
/// iris connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PupilSlots {
    /// First member gives the top x, second the right y
    pub top_x_right_y: usize,
    /// First member gives the bottom x, second the left y
    pub bottom_x_left_y: usize,
    /// First member gives the left x, second the top y
    pub left_x_top_y: usize,
    /// First member gives the right x, second the bottom y
    pub right_x_bottom_y: usize,
}

/// Landmarks taken as the extreme points of one eye outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeExtremes {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

/// Versioned landmark numbering for one detector configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceMeshTopology {
    pub version: &'static str,
    pub landmark_count: usize,
    pub iris: IndexGroup,
    pub left_eye: IndexGroup,
    pub right_eye: IndexGroup,
    pub left_pupil: PupilSlots,
    pub right_pupil: PupilSlots,
    pub left_eye_box: EyeExtremes,
    pub right_eye_box: EyeExtremes,
}

impl FaceMeshTopology {
    /// MediaPipe face mesh with refined (iris) landmarks, 478 points.
    ///
    /// Iris edges are listed in the order the detector enumerates its
    /// combined iris connection set.
    pub const MEDIAPIPE_REFINED: FaceMeshTopology = FaceMeshTopology {
        version: "mediapipe-face-mesh-refined-478",
        landmark_count: 478,
        iris: IndexGroup {
            name: "irises",
            edges: &[
                (475, 476),
                (477, 474),
                (469, 470),
                (472, 469),
                (471, 472),
                (474, 475),
                (476, 477),
                (470, 471),
            ],
        },
        left_eye: IndexGroup {
            name: "left_eye",
            edges: &[
                (263, 249),
                (249, 390),
                (390, 373),
                (373, 374),
                (374, 380),
                (380, 381),
                (381, 382),
                (382, 362),
                (263, 466),
                (466, 388),
                (388, 387),
                (387, 386),
                (386, 385),
                (385, 384),
                (384, 398),
                (398, 362),
            ],
        },
        right_eye: IndexGroup {
            name: "right_eye",
            edges: &[
                (33, 7),
                (7, 163),
                (163, 144),
                (144, 145),
                (145, 153),
                (153, 154),
                (154, 155),
                (155, 133),
                (33, 246),
                (246, 161),
                (161, 160),
                (160, 159),
                (159, 158),
                (158, 157),
                (157, 173),
                (173, 133),
            ],
        },
        left_pupil: PupilSlots {
            top_x_right_y: 0,
            bottom_x_left_y: 1,
            left_x_top_y: 5,
            right_x_bottom_y: 6,
        },
        right_pupil: PupilSlots {
            top_x_right_y: 2,
            bottom_x_left_y: 3,
            left_x_top_y: 4,
            right_x_bottom_y: 7,
        },
        left_eye_box: EyeExtremes {
            top: 386,
            bottom: 374,
            left: 362,
            right: 263,
        },
        right_eye_box: EyeExtremes {
            top: 159,
            bottom: 145,
            left: 33,
            right: 133,
        },
    };

    pub fn pupil_slots(&self, eye: Eye) -> PupilSlots {
        match eye {
            Eye::Left => self.left_pupil,
            Eye::Right => self.right_pupil,
        }
    }

    pub fn eye_extremes(&self, eye: Eye) -> EyeExtremes {
        match eye {
            Eye::Left => self.left_eye_box,
            Eye::Right => self.right_eye_box,
        }
    }

    pub fn eye_outline(&self, eye: Eye) -> &IndexGroup {
        match eye {
            Eye::Left => &self.left_eye,
            Eye::Right => &self.right_eye,
        }
    }
}
