use glam::Vec2;
use nalgebra as na;
use serde::Serialize;

use crate::calibration::StereoCalibration;
use crate::detected_hands::StereoFrame;
use crate::error::Result;
use crate::landmark::{Finger, HandLandmark, Landmark2D, Landmark3D};
use crate::matching::{DEFAULT_MATCH_TOLERANCE, match_hands};
use crate::triangulation::{DEFAULT_MIN_DISPARITY_PX, Triangulator};
use crate::types::{Camera, Handedness};

/// A hand seen by both cameras in one frame, with its triangulated keypoints.
#[derive(Debug, Clone, Serialize)]
pub struct HandObservation {
    pub handedness: Handedness,
    pub confidence: f32,
    pub landmarks_3d: Vec<Landmark3D>,
    pub landmarks_2d_left: Vec<Landmark2D>,
    pub landmarks_2d_right: Vec<Landmark2D>,
}

impl HandObservation {
    pub fn landmark(&self, landmark: HandLandmark) -> Option<&Landmark3D> {
        self.landmarks_3d.get(landmark.index())
    }

    /// Position of `landmark` if it was triangulated reliably.
    pub fn position(&self, landmark: HandLandmark) -> Option<na::Vector3<f64>> {
        self.landmark(landmark).and_then(|lm| lm.position())
    }

    pub fn wrist(&self) -> Option<&Landmark3D> {
        self.landmark(HandLandmark::Wrist)
    }

    pub fn fingertip_positions(&self) -> Vec<(Finger, Landmark3D)> {
        Finger::ALL
            .iter()
            .filter_map(|f| self.landmark(f.tip()).map(|lm| (*f, *lm)))
            .collect()
    }

    /// Rough pose heuristic on the triangulated joints.
    ///
    /// The thumb opens sideways, so it compares `x` of tip and base and the
    /// sign depends on handedness. Other fingers are extended when the tip is
    /// above the base (image `y` grows downward).
    pub fn is_finger_extended(&self, finger: Finger) -> bool {
        let joints = finger.joints();
        let (Some(base), Some(tip)) = (self.position(joints[0]), self.position(joints[3])) else {
            return false;
        };
        match finger {
            Finger::Thumb => match self.handedness {
                Handedness::Right => tip.x > base.x,
                Handedness::Left => tip.x < base.x,
            },
            _ => tip.y < base.y,
        }
    }
}

/// Turns per-camera detector output into triangulated hands.
pub struct HandTracker {
    calibration: Option<StereoCalibration>,
    img_w_h: (u32, u32),
    min_disparity_px: f64,
    match_tolerance: f32,
}

impl HandTracker {
    pub fn new(calibration: Option<StereoCalibration>, img_w_h: (u32, u32)) -> HandTracker {
        HandTracker {
            calibration,
            img_w_h,
            min_disparity_px: DEFAULT_MIN_DISPARITY_PX,
            match_tolerance: DEFAULT_MATCH_TOLERANCE,
        }
    }

    pub fn with_thresholds(mut self, min_disparity_px: f64, match_tolerance: f32) -> HandTracker {
        self.min_disparity_px = min_disparity_px;
        self.match_tolerance = match_tolerance;
        self
    }

    pub fn set_calibration(&mut self, calibration: StereoCalibration) {
        self.calibration = Some(calibration);
    }

    pub fn calibration(&self) -> Option<&StereoCalibration> {
        self.calibration.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.calibration.is_some()
    }

    /// Pairs left and right detections and triangulates every keypoint.
    ///
    /// Returns one observation per matched left hand, in left detection
    /// order. Errors only when no calibration is loaded.
    pub fn process_frame(&self, frame: &StereoFrame) -> Result<Vec<HandObservation>> {
        let triangulator =
            Triangulator::from_calibration(self.calibration.as_ref(), self.min_disparity_px)?;
        if frame.left.is_empty() || frame.right.is_empty() {
            return Ok(Vec::new());
        }
        let pairs = match_hands(&frame.left, &frame.right, self.match_tolerance);
        let hands = pairs
            .into_iter()
            .map(|(li, ri)| {
                let left = &frame.left[li];
                let right = &frame.right[ri];
                let left_px = left.to_pixels(self.img_w_h);
                let right_px = right.to_pixels(self.img_w_h);
                HandObservation {
                    handedness: left.handedness,
                    confidence: left.score,
                    landmarks_3d: triangulator.triangulate_all(&left_px, &right_px),
                    landmarks_2d_left: to_landmarks_2d(&left_px, Camera::Left),
                    landmarks_2d_right: to_landmarks_2d(&right_px, Camera::Right),
                }
            })
            .collect();
        Ok(hands)
    }
}

fn to_landmarks_2d(pixels: &[Vec2], camera: Camera) -> Vec<Landmark2D> {
    pixels
        .iter()
        .map(|p| Landmark2D { p2d: *p, camera })
        .collect()
}
