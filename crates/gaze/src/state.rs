//! Gaze states and their presentation

use serde::{Deserialize, Serialize};

/// Classifier output for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GazeState {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    LeftBlink,
    BothBlink,
    RightBlink,
    #[default]
    Undetermined,
}

/// Vertical band of the gaze ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalBand {
    Top,
    Middle,
    Bottom,
}

/// Horizontal band of the gaze ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalBand {
    Left,
    Middle,
    Right,
}

impl VerticalBand {
    /// `ratio <= low` is top, `ratio >= high` is bottom
    pub fn classify(ratio: f64, (low, high): (f64, f64)) -> Self {
        if ratio <= low {
            VerticalBand::Top
        } else if ratio >= high {
            VerticalBand::Bottom
        } else {
            VerticalBand::Middle
        }
    }
}

impl HorizontalBand {
    /// `ratio >= high` is right, `ratio <= low` is left
    pub fn classify(ratio: f64, (low, high): (f64, f64)) -> Self {
        if ratio >= high {
            HorizontalBand::Right
        } else if ratio <= low {
            HorizontalBand::Left
        } else {
            HorizontalBand::Middle
        }
    }
}

/// Direction lookup, rows top to bottom, columns left to right
const DIRECTIONS: [[GazeState; 3]; 3] = [
    [GazeState::TopLeft, GazeState::Top, GazeState::TopRight],
    [GazeState::Left, GazeState::Center, GazeState::Right],
    [GazeState::BottomLeft, GazeState::Bottom, GazeState::BottomRight],
];

impl GazeState {
    pub const ALL: [GazeState; 13] = [
        GazeState::TopLeft,
        GazeState::Top,
        GazeState::TopRight,
        GazeState::Left,
        GazeState::Center,
        GazeState::Right,
        GazeState::BottomLeft,
        GazeState::Bottom,
        GazeState::BottomRight,
        GazeState::LeftBlink,
        GazeState::BothBlink,
        GazeState::RightBlink,
        GazeState::Undetermined,
    ];

    /// Combine independent vertical and horizontal bands
    pub fn from_bands(vertical: VerticalBand, horizontal: HorizontalBand) -> Self {
        let row = match vertical {
            VerticalBand::Top => 0,
            VerticalBand::Middle => 1,
            VerticalBand::Bottom => 2,
        };
        let col = match horizontal {
            HorizontalBand::Left => 0,
            HorizontalBand::Middle => 1,
            HorizontalBand::Right => 2,
        };
        DIRECTIONS[row][col]
    }

    pub fn is_blink(&self) -> bool {
        matches!(
            self,
            GazeState::LeftBlink | GazeState::BothBlink | GazeState::RightBlink
        )
    }

    pub fn is_direction(&self) -> bool {
        !self.is_blink() && *self != GazeState::Undetermined
    }

    /// Stable identifier, matching the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            GazeState::TopLeft => "top_left",
            GazeState::Top => "top",
            GazeState::TopRight => "top_right",
            GazeState::Left => "left",
            GazeState::Center => "center",
            GazeState::Right => "right",
            GazeState::BottomLeft => "bottom_left",
            GazeState::Bottom => "bottom",
            GazeState::BottomRight => "bottom_right",
            GazeState::LeftBlink => "left_blink",
            GazeState::BothBlink => "both_blink",
            GazeState::RightBlink => "right_blink",
            GazeState::Undetermined => "undetermined",
        }
    }

    /// Display text
    pub fn label(&self) -> &'static str {
        match self {
            GazeState::TopLeft => "Looking top left",
            GazeState::Top => "Looking top",
            GazeState::TopRight => "Looking top right",
            GazeState::Left => "Looking left",
            GazeState::Center => "Looking centre",
            GazeState::Right => "Looking right",
            GazeState::BottomLeft => "Looking bottom left",
            GazeState::Bottom => "Looking bottom",
            GazeState::BottomRight => "Looking bottom right",
            GazeState::LeftBlink => "Left eye is blinking",
            GazeState::BothBlink => "Both eyes are blinking",
            GazeState::RightBlink => "Right eye is blinking",
            GazeState::Undetermined => "...",
        }
    }

    /// Arrow direction in degrees, counter-clockwise from the +x axis
    pub fn arrow_angle_degrees(&self) -> Option<f64> {
        match self {
            GazeState::TopLeft => Some(135.0),
            GazeState::Top => Some(90.0),
            GazeState::TopRight => Some(45.0),
            GazeState::Left => Some(180.0),
            GazeState::Right => Some(0.0),
            GazeState::BottomLeft => Some(225.0),
            GazeState::Bottom => Some(270.0),
            GazeState::BottomRight => Some(315.0),
            _ => None,
        }
    }

    /// Which eye markers render as closed: (left, right)
    pub fn eye_closed_markers(&self) -> (bool, bool) {
        match self {
            GazeState::LeftBlink => (true, false),
            GazeState::BothBlink => (true, true),
            GazeState::RightBlink => (false, true),
            _ => (false, false),
        }
    }
}

impl std::fmt::Display for GazeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Screen offset (y down) of a vector with `radius` and `angle_degrees`, truncated
pub fn polar_to_offset(radius: f64, angle_degrees: f64) -> (i32, i32) {
    let theta = (-angle_degrees).to_radians();
    ((radius * theta.cos()) as i32, (radius * theta.sin()) as i32)
}
