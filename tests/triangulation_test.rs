use glam::Vec2;
use nalgebra as na;
use stereo_hand_haptics::HapticsError;
use stereo_hand_haptics::calibration::StereoCalibration;
use stereo_hand_haptics::detected_hands::{DetectedHand, StereoFrame};
use stereo_hand_haptics::hand_tracker::HandTracker;
use stereo_hand_haptics::landmark::{Finger, HandLandmark};
use stereo_hand_haptics::triangulation::{DEFAULT_MIN_DISPARITY_PX, Triangulator};
use stereo_hand_haptics::types::Handedness;

const F: f64 = 500.0;
const CX: f64 = 320.0;
const CY: f64 = 240.0;
const BASELINE: f64 = 60.0;
const IMG_W_H: (u32, u32) = (640, 480);

/// Normalized left/right keypoints of a 3D point seen by the rectified rig.
fn project(p: &na::Vector3<f64>) -> (Vec2, Vec2) {
    let xl = F * p.x / p.z + CX;
    let xr = F * (p.x - BASELINE) / p.z + CX;
    let y = F * p.y / p.z + CY;
    let w = IMG_W_H.0 as f64;
    let h = IMG_W_H.1 as f64;
    (
        Vec2::new((xl / w) as f32, (y / h) as f32),
        Vec2::new((xr / w) as f32, (y / h) as f32),
    )
}

fn stereo_hand(
    points: &[na::Vector3<f64>],
    handedness: Handedness,
) -> (DetectedHand, DetectedHand) {
    let (left, right): (Vec<_>, Vec<_>) = points.iter().map(project).unzip();
    (
        DetectedHand {
            handedness,
            score: 0.95,
            keypoints: left,
        },
        DetectedHand {
            handedness,
            score: 0.9,
            keypoints: right,
        },
    )
}

fn hand_points(offset: na::Vector3<f64>) -> Vec<na::Vector3<f64>> {
    (0..HandLandmark::COUNT)
        .map(|i| offset + na::Vector3::new(i as f64 * 2.0, -(i as f64) * 3.0, i as f64))
        .collect()
}

#[test]
fn test_perspective_divide_for_various_q() {
    let qs = [
        StereoCalibration::rectified(F, CX, CY, BASELINE).q,
        na::Matrix4::new(
            2.0, 0.1, 0.0, -10.0, 0.0, 1.5, 0.3, 4.0, 0.2, 0.0, 0.0, 900.0, 0.0, 0.0, 0.05, 1.0,
        ),
    ];
    for q in qs {
        let tri = Triangulator::new(q, DEFAULT_MIN_DISPARITY_PX);
        for (xl, yl, xr) in [(400.0, 200.0, 350.0), (100.0, 50.0, 99.0), (10.0, 470.0, 40.0)] {
            let h = q * na::Vector4::new(xl, yl, xl - xr, 1.0);
            if h[3] == 0.0 {
                continue;
            }
            let expected = na::Vector3::new(h[0] / h[3], h[1] / h[3], h[2] / h[3]);
            let lm = tri.triangulate(xl, yl, xr);
            assert!(lm.valid);
            assert!((lm.p3d - expected).norm() < 1e-9, "got {:?}", lm.p3d);
        }
    }
}

#[test]
fn test_small_disparity_regardless_of_q() {
    let qs = [na::Matrix4::identity(), StereoCalibration::rectified(F, CX, CY, BASELINE).q];
    for q in qs {
        let tri = Triangulator::new(q, DEFAULT_MIN_DISPARITY_PX);
        for d in [-0.99, -0.5, 0.0, 0.3, 0.999] {
            let lm = tri.triangulate(300.0 + d, 200.0, 300.0);
            assert!(!lm.valid);
            assert_eq!(lm.p3d, na::Vector3::zeros());
        }
    }
}

#[test]
fn test_rectified_rig_recovers_depth() {
    let calib = StereoCalibration::rectified(F, CX, CY, BASELINE);
    let tri = Triangulator::from_calibration(Some(&calib), DEFAULT_MIN_DISPARITY_PX).unwrap();
    let p = na::Vector3::new(35.0, -20.0, 400.0);
    let xl = F * p.x / p.z + CX;
    let xr = F * (p.x - BASELINE) / p.z + CX;
    let y = F * p.y / p.z + CY;
    let lm = tri.triangulate(xl, y, xr);
    assert!(lm.valid);
    assert!((lm.p3d - p).norm() < 1e-9, "got {:?}", lm.p3d);
}

#[test]
fn test_tracker_triangulates_matched_hand() {
    let calib = StereoCalibration::rectified(F, CX, CY, BASELINE);
    let tracker = HandTracker::new(Some(calib), IMG_W_H);
    let truth = hand_points(na::Vector3::new(-30.0, 10.0, 380.0));
    let (left, right) = stereo_hand(&truth, Handedness::Right);
    let frame = StereoFrame {
        time_ns: 1,
        left: vec![left],
        right: vec![right],
    };

    let hands = tracker.process_frame(&frame).unwrap();
    assert_eq!(hands.len(), 1);
    let hand = &hands[0];
    assert_eq!(hand.handedness, Handedness::Right);
    assert!((hand.confidence - 0.95).abs() < 1e-6);
    assert_eq!(hand.landmarks_3d.len(), HandLandmark::COUNT);
    assert_eq!(hand.landmarks_2d_left.len(), HandLandmark::COUNT);
    for (lm, p) in hand.landmarks_3d.iter().zip(&truth) {
        assert!(lm.valid);
        assert!((lm.p3d - p).norm() < 0.5, "expected {:?}, got {:?}", p, lm.p3d);
    }
    let tip = hand.position(HandLandmark::IndexFingerTip).unwrap();
    assert!((tip - truth[8]).norm() < 0.5);
    assert_eq!(hand.fingertip_positions().len(), 5);
    // tips lie above (smaller y) and to the right of their bases
    assert!(hand.is_finger_extended(Finger::Index));
    assert!(hand.is_finger_extended(Finger::Thumb));
}

#[test]
fn test_tracker_marks_far_points_invalid() {
    let calib = StereoCalibration::rectified(F, CX, CY, BASELINE);
    let tracker = HandTracker::new(Some(calib), IMG_W_H);
    // disparity F * B / Z = 0.3 px
    let truth = hand_points(na::Vector3::new(0.0, 0.0, 100_000.0));
    let (left, right) = stereo_hand(&truth, Handedness::Left);
    let frame = StereoFrame {
        time_ns: 0,
        left: vec![left],
        right: vec![right],
    };
    let hands = tracker.process_frame(&frame).unwrap();
    assert_eq!(hands.len(), 1);
    assert!(hands[0].landmarks_3d.iter().all(|lm| !lm.valid));
    assert!(hands[0].position(HandLandmark::IndexFingerTip).is_none());
    assert!(!hands[0].is_finger_extended(Finger::Index));
}

#[test]
fn test_tracker_without_calibration() {
    let tracker = HandTracker::new(None, IMG_W_H);
    assert!(!tracker.is_ready());
    let result = tracker.process_frame(&StereoFrame::default());
    assert!(matches!(result, Err(HapticsError::MissingCalibration)));
}
