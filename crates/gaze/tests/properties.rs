use face_landmarks::{Eye, FaceMeshTopology, LandmarkPoint, LandmarkSet};
use gaze::{eye_bounding_box, pupil_center, Classifier, GazeRatios, GazeState};
use proptest::prelude::*;
use video_frame::FrameSize;

const TOPOLOGY: &FaceMeshTopology = &FaceMeshTopology::MEDIAPIPE_REFINED;

fn unit() -> impl Strategy<Value = f32> {
    0.0f32..1.0
}

fn landmarks_with(indices: &[usize], points: &[(f32, f32)]) -> LandmarkSet {
    let mut set = LandmarkSet::new(vec![LandmarkPoint::default(); 478]);
    for (&index, &(x, y)) in indices.iter().zip(points) {
        set.set(index, LandmarkPoint::new(x, y));
    }
    set
}

proptest! {
    #[test]
    fn pupil_lies_within_iris_bounds(
        points in prop::collection::vec((unit(), unit()), 4),
        width in 1u32..4000,
        height in 1u32..4000,
    ) {
        let indices = [474, 475, 476, 477];
        let set = landmarks_with(&indices, &points);
        let size = FrameSize::new(width, height);

        let pupil = pupil_center(&set, TOPOLOGY, Eye::Left, size).unwrap();
        let pixels: Vec<_> = points
            .iter()
            .map(|&(x, y)| LandmarkPoint::new(x, y).to_pixel(size))
            .collect();

        prop_assert!(pupil.x >= pixels.iter().map(|p| p.x).min().unwrap());
        prop_assert!(pupil.x <= pixels.iter().map(|p| p.x).max().unwrap());
        prop_assert!(pupil.y >= pixels.iter().map(|p| p.y).min().unwrap());
        prop_assert!(pupil.y <= pixels.iter().map(|p| p.y).max().unwrap());
    }

    #[test]
    fn eye_box_scales_with_width(
        points in prop::collection::vec((unit(), unit()), 4),
        width in 1u32..2000,
        height in 1u32..2000,
    ) {
        let set = landmarks_with(&[159, 145, 33, 133], &points);
        let base = eye_bounding_box(&set, TOPOLOGY, Eye::Right, FrameSize::new(width, height)).unwrap();
        let wide = eye_bounding_box(&set, TOPOLOGY, Eye::Right, FrameSize::new(width * 2, height)).unwrap();

        prop_assert!((wide.min_x - 2 * base.min_x).abs() <= 1);
        prop_assert!((wide.max_x - 2 * base.max_x).abs() <= 1);
        prop_assert_eq!(wide.min_y, base.min_y);
        prop_assert_eq!(wide.max_y, base.max_y);
    }

    #[test]
    fn left_blink_dominates(
        horizontal in 0.0f64..2.0,
        vertical in 0.0f64..2.0,
        blink_left in 0.0f64..=0.3,
        blink_right in 0.31f64..3.0,
    ) {
        let ratios = GazeRatios {
            horizontal: Some(horizontal),
            vertical: Some(vertical),
            blink_left,
            blink_right,
        };
        prop_assert_eq!(Classifier::default().decide(&ratios), GazeState::LeftBlink);
    }

    #[test]
    fn open_eyes_give_a_direction(
        horizontal in 0.0f64..2.0,
        vertical in 0.0f64..2.0,
        blink_left in 0.31f64..3.0,
        blink_right in 0.31f64..3.0,
    ) {
        let ratios = GazeRatios {
            horizontal: Some(horizontal),
            vertical: Some(vertical),
            blink_left,
            blink_right,
        };
        prop_assert!(Classifier::default().decide(&ratios).is_direction());
    }
}

#[test]
fn absent_landmarks_are_undetermined() {
    let result = gaze::classify(None, None);
    assert!(result.ratios.is_none());
    assert_eq!(result.state, GazeState::Undetermined);
}
