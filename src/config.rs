use serde::{Deserialize, Serialize};

use crate::landmark::HandLandmark;
use crate::matching::DEFAULT_MATCH_TOLERANCE;
use crate::triangulation::DEFAULT_MIN_DISPARITY_PX;

/// Tunable policy for a tracking session.
///
/// The disparity and matching thresholds depend on the rig's baseline and
/// resolution; the defaults suit a 640x480 pair a few centimetres apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_min_disparity_px")]
    pub min_disparity_px: f64,
    /// Max wrist row difference (normalized) for a left/right hand pair.
    #[serde(default = "default_hand_match_tolerance")]
    pub hand_match_tolerance: f32,
    /// Keypoint whose position drives the haptics.
    #[serde(default = "default_tracked_landmark")]
    pub tracked_landmark: HandLandmark,
    #[serde(default = "default_channel_count")]
    pub channel_count: usize,
    #[serde(default = "default_thickness_mm")]
    pub default_thickness_mm: f64,
    #[serde(default = "default_curve_samples")]
    pub curve_samples: usize,
    #[serde(default = "default_curve_x_range_mm")]
    pub curve_x_range_mm: (f64, f64),
    #[serde(default = "default_curve_plane_z_mm")]
    pub curve_plane_z_mm: f64,
    /// Rectified image size (width, height) the detector ran on.
    #[serde(default = "default_image_size")]
    pub image_size: (u32, u32),
}

fn default_min_disparity_px() -> f64 {
    DEFAULT_MIN_DISPARITY_PX
}
fn default_hand_match_tolerance() -> f32 {
    DEFAULT_MATCH_TOLERANCE
}
fn default_tracked_landmark() -> HandLandmark {
    HandLandmark::IndexFingerTip
}
fn default_channel_count() -> usize {
    2
}
fn default_thickness_mm() -> f64 {
    20.0
}
fn default_curve_samples() -> usize {
    200
}
fn default_curve_x_range_mm() -> (f64, f64) {
    (-200.0, 200.0)
}
fn default_curve_plane_z_mm() -> f64 {
    400.0
}
fn default_image_size() -> (u32, u32) {
    (640, 480)
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_disparity_px: default_min_disparity_px(),
            hand_match_tolerance: default_hand_match_tolerance(),
            tracked_landmark: default_tracked_landmark(),
            channel_count: default_channel_count(),
            default_thickness_mm: default_thickness_mm(),
            curve_samples: default_curve_samples(),
            curve_x_range_mm: default_curve_x_range_mm(),
            curve_plane_z_mm: default_curve_plane_z_mm(),
            image_size: default_image_size(),
        }
    }
}
