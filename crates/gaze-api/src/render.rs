//! Frame annotation

use face_landmarks::{Eye, FaceLandmarks, IndexGroup};
use gaze::{polar_to_offset, FrameAnalysis, PixelPoint};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use video_frame::{FrameError, VideoFrame};

use crate::session::OverlayOptions;

const PUPIL_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const CONTOUR_COLOR: Rgb<u8> = Rgb([48, 255, 48]);
const IRIS_COLOR: Rgb<u8> = Rgb([48, 48, 255]);
const LANDMARK_COLOR: Rgb<u8> = Rgb([224, 224, 224]);
const PANEL_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// Half length of a pupil marker arm (pixels)
const PUPIL_MARKER_ARM: i32 = 3;

/// Gaze panel layout
const PANEL_LEFT_CENTER: (i32, i32) = (100, 250);
const PANEL_RIGHT_CENTER: (i32, i32) = (250, 250);
const PANEL_RADIUS: i32 = 50;

/// Draw the selected overlays onto a copy of the frame
pub fn annotate(
    frame: &VideoFrame,
    face: Option<&FaceLandmarks>,
    analysis: &FrameAnalysis,
    options: &OverlayOptions,
) -> Result<RgbImage, FrameError> {
    let mut image = frame.to_image()?;

    if let Some(face) = face {
        if options.landmarks {
            draw_landmarks(&mut image, face);
        }
        if options.eye_contours {
            for eye in Eye::BOTH {
                draw_group(&mut image, face, face.topology().eye_outline(eye), CONTOUR_COLOR);
            }
        }
        if options.iris_contours {
            draw_group(&mut image, face, face.iris(), IRIS_COLOR);
        }
    }

    if options.pupils {
        if let (Some(left), Some(right)) = (analysis.left_pupil, analysis.right_pupil) {
            draw_plus(&mut image, left, PUPIL_COLOR);
            draw_plus(&mut image, right, PUPIL_COLOR);
        }
    }

    if options.mirror {
        image::imageops::flip_horizontal_in_place(&mut image);
    }

    if options.gaze_direction {
        draw_gaze_panel(&mut image, analysis);
    }

    Ok(image)
}

fn pixel(face: &FaceLandmarks, index: usize, image: &RgbImage) -> Option<(f32, f32)> {
    let point = face.landmarks().get(index)?;
    Some((
        point.pixel_x(image.width()) as f32,
        point.pixel_y(image.height()) as f32,
    ))
}

fn draw_landmarks(image: &mut RgbImage, face: &FaceLandmarks) {
    let (width, height) = image.dimensions();
    for point in face.landmarks().iter() {
        let center = (point.pixel_x(width), point.pixel_y(height));
        draw_filled_circle_mut(image, center, 1, LANDMARK_COLOR);
    }
}

fn draw_group(image: &mut RgbImage, face: &FaceLandmarks, group: &IndexGroup, color: Rgb<u8>) {
    for &(a, b) in group.edges {
        if let (Some(start), Some(end)) = (pixel(face, a, image), pixel(face, b, image)) {
            draw_line_segment_mut(image, start, end, color);
        }
    }
}

fn draw_plus(image: &mut RgbImage, center: PixelPoint, color: Rgb<u8>) {
    let (x, y) = (center.x as f32, center.y as f32);
    let arm = PUPIL_MARKER_ARM as f32;
    draw_line_segment_mut(image, (x - arm, y), (x + arm, y), color);
    draw_line_segment_mut(image, (x, y - arm), (x, y + arm), color);
}

/// Two eye circles with an arrow along the gaze; a closed eye is filled
fn draw_gaze_panel(image: &mut RgbImage, analysis: &FrameAnalysis) {
    let (left_closed, right_closed) = analysis.state.eye_closed_markers();
    let offset = analysis
        .state
        .arrow_angle_degrees()
        .map(|angle| polar_to_offset(PANEL_RADIUS as f64, angle));

    for (center, closed) in [
        (PANEL_LEFT_CENTER, left_closed),
        (PANEL_RIGHT_CENTER, right_closed),
    ] {
        if closed {
            draw_filled_circle_mut(image, center, PANEL_RADIUS, PANEL_COLOR);
        } else {
            draw_hollow_circle_mut(image, center, PANEL_RADIUS, PANEL_COLOR);
            draw_hollow_circle_mut(image, center, PANEL_RADIUS - 1, PANEL_COLOR);
        }

        if let Some((dx, dy)) = offset {
            draw_arrow(image, center, (center.0 + dx, center.1 + dy), PANEL_COLOR);
        }
    }
}

fn draw_arrow(image: &mut RgbImage, start: (i32, i32), end: (i32, i32), color: Rgb<u8>) {
    let (sx, sy) = (start.0 as f32, start.1 as f32);
    let (ex, ey) = (end.0 as f32, end.1 as f32);
    draw_line_segment_mut(image, (sx, sy), (ex, ey), color);

    let length = ((ex - sx).powi(2) + (ey - sy).powi(2)).sqrt();
    if length == 0.0 {
        return;
    }
    let head = length * 0.1;
    let back = (sy - ey).atan2(sx - ex);
    for spread in [-std::f32::consts::FRAC_PI_4, std::f32::consts::FRAC_PI_4] {
        let angle = back + spread;
        draw_line_segment_mut(
            image,
            (ex, ey),
            (ex + head * angle.cos(), ey + head * angle.sin()),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaze::GazeState;
    use video_frame::FrameSize;

    fn black(width: u32, height: u32) -> VideoFrame {
        VideoFrame::new(vec![0; (width * height * 3) as usize], width, height, 0, 0).unwrap()
    }

    fn analysis_with(state: GazeState, size: FrameSize) -> FrameAnalysis {
        FrameAnalysis {
            state,
            ..FrameAnalysis::no_face(size)
        }
    }

    #[test]
    fn test_no_overlays_is_identity() {
        let frame = black(64, 48);
        let analysis = FrameAnalysis::no_face(frame.size());
        let image = annotate(&frame, None, &analysis, &OverlayOptions::none()).unwrap();
        assert_eq!(image.into_raw(), frame.data);
    }

    #[test]
    fn test_pupil_markers_drawn() {
        let frame = black(64, 48);
        let mut analysis = FrameAnalysis::no_face(frame.size());
        analysis.left_pupil = Some(PixelPoint::new(10, 10));
        analysis.right_pupil = Some(PixelPoint::new(40, 20));

        let options = OverlayOptions {
            pupils: true,
            ..OverlayOptions::none()
        };
        let image = annotate(&frame, None, &analysis, &options).unwrap();
        assert_eq!(*image.get_pixel(12, 10), PUPIL_COLOR);
        assert_eq!(*image.get_pixel(40, 18), PUPIL_COLOR);
        assert_eq!(*image.get_pixel(20, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_mirror_moves_markers() {
        let frame = black(64, 48);
        let mut analysis = FrameAnalysis::no_face(frame.size());
        analysis.left_pupil = Some(PixelPoint::new(10, 10));
        analysis.right_pupil = Some(PixelPoint::new(10, 30));

        let options = OverlayOptions {
            pupils: true,
            mirror: true,
            ..OverlayOptions::none()
        };
        let image = annotate(&frame, None, &analysis, &options).unwrap();
        assert_eq!(*image.get_pixel(53, 10), PUPIL_COLOR);
        assert_eq!(*image.get_pixel(10, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_blink_fills_panel_circle() {
        let frame = black(400, 320);
        let analysis = analysis_with(GazeState::LeftBlink, frame.size());
        let options = OverlayOptions {
            gaze_direction: true,
            ..OverlayOptions::none()
        };
        let image = annotate(&frame, None, &analysis, &options).unwrap();
        assert_eq!(*image.get_pixel(100, 250), PANEL_COLOR);
        assert_eq!(*image.get_pixel(250, 250), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_arrow_points_along_gaze() {
        let frame = black(400, 320);
        let analysis = analysis_with(GazeState::Top, frame.size());
        let options = OverlayOptions {
            gaze_direction: true,
            ..OverlayOptions::none()
        };
        let image = annotate(&frame, None, &analysis, &options).unwrap();
        assert_eq!(*image.get_pixel(100, 230), PANEL_COLOR);
        assert_eq!(*image.get_pixel(100, 270), Rgb([0, 0, 0]));
    }
}
