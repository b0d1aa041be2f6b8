//! Pupil localization from iris landmarks

use face_landmarks::{Eye, FaceMeshTopology, LandmarkSet, PixelPoint};
use video_frame::FrameSize;

/// Pixel-space pupil centre of one eye.
///
/// Reads the four iris edges assigned to `eye`, taking the x of one cardinal
/// point and the y of another from each edge, denormalizes them and returns
/// the truncated mean. `None` when a referenced landmark is missing.
pub fn pupil_center(
    landmarks: &LandmarkSet,
    topology: &FaceMeshTopology,
    eye: Eye,
    size: FrameSize,
) -> Option<PixelPoint> {
    let slots = topology.pupil_slots(eye);
    let iris = &topology.iris;

    let (xt, yr) = iris.edge(slots.top_x_right_y)?;
    let (xb, yl) = iris.edge(slots.bottom_x_left_y)?;
    let (xl, yt) = iris.edge(slots.left_x_top_y)?;
    let (xr, yb) = iris.edge(slots.right_x_bottom_y)?;

    let x = |index: usize| landmarks.get(index).map(|p| p.pixel_x(size.width));
    let y = |index: usize| landmarks.get(index).map(|p| p.pixel_y(size.height));

    let xs = [x(xt)?, x(xr)?, x(xl)?, x(xb)?];
    let ys = [y(yt)?, y(yr)?, y(yl)?, y(yb)?];

    Some(PixelPoint::new(truncated_mean(&xs), truncated_mean(&ys)))
}

fn truncated_mean(values: &[i32; 4]) -> i32 {
    let sum: i64 = values.iter().map(|&v| v as i64).sum();
    (sum as f64 / values.len() as f64) as i32
}
