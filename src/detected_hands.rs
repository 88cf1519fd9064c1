use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::Handedness;

/// One hand as reported by the landmark detector for a single camera.
///
/// Keypoints are normalized to `[0, 1]` of the rectified image, in detector
/// order (see [`crate::landmark::HandLandmark`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedHand {
    pub handedness: Handedness,
    pub score: f32,
    pub keypoints: Vec<Vec2>,
}

impl DetectedHand {
    pub fn wrist(&self) -> Option<Vec2> {
        self.keypoints.first().copied()
    }

    pub fn to_pixels(&self, img_w_h: (u32, u32)) -> Vec<Vec2> {
        let scale = Vec2::new(img_w_h.0 as f32, img_w_h.1 as f32);
        self.keypoints.iter().map(|p| *p * scale).collect()
    }
}

/// Detector output for one synchronized left/right frame pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StereoFrame {
    #[serde(default)]
    pub time_ns: i64,
    pub left: Vec<DetectedHand>,
    pub right: Vec<DetectedHand>,
}
