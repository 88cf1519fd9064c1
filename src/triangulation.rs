use glam::Vec2;
use nalgebra as na;

use crate::calibration::StereoCalibration;
use crate::error::{HapticsError, Result};
use crate::landmark::Landmark3D;

/// Disparities below this (in pixels) are treated as degenerate.
pub const DEFAULT_MIN_DISPARITY_PX: f64 = 1.0;

/// Reprojects matched rectified pixel pairs into the rig frame through `Q`.
#[derive(Debug, Clone)]
pub struct Triangulator {
    q: na::Matrix4<f64>,
    min_disparity_px: f64,
}

impl Triangulator {
    pub fn new(q: na::Matrix4<f64>, min_disparity_px: f64) -> Triangulator {
        Triangulator {
            q,
            min_disparity_px,
        }
    }

    /// Builds a triangulator from a loaded calibration.
    ///
    /// Fails with [`HapticsError::MissingCalibration`] when no calibration is
    /// available; this is a setup error, not a per-frame condition.
    pub fn from_calibration(
        calibration: Option<&StereoCalibration>,
        min_disparity_px: f64,
    ) -> Result<Triangulator> {
        let Some(calibration) = calibration else {
            log::error!("triangulation requested without stereo calibration");
            return Err(HapticsError::MissingCalibration);
        };
        calibration.validate()?;
        Ok(Triangulator::new(calibration.q, min_disparity_px))
    }

    pub fn min_disparity_px(&self) -> f64 {
        self.min_disparity_px
    }

    pub fn q(&self) -> &na::Matrix4<f64> {
        &self.q
    }

    /// Triangulates one point seen at `(x_left, y_left)` in the left image and
    /// at column `x_right` in the right image.
    ///
    /// Rows are assumed aligned after rectification, so only the left row is
    /// used. Degenerate geometry yields [`Landmark3D::invalid`].
    pub fn triangulate(&self, x_left: f64, y_left: f64, x_right: f64) -> Landmark3D {
        let disparity = x_left - x_right;
        if disparity.abs() < self.min_disparity_px {
            log::trace!("disparity {:.3} px below threshold", disparity);
            return Landmark3D::invalid();
        }
        let h = self.q * na::Vector4::new(x_left, y_left, disparity, 1.0);
        let w = h[3];
        if w == 0.0 {
            log::trace!("zero homogeneous weight at disparity {:.3}", disparity);
            return Landmark3D::invalid();
        }
        Landmark3D::new(na::Vector3::new(h[0] / w, h[1] / w, h[2] / w))
    }

    /// Triangulates corresponding keypoint lists (pixels) pairwise.
    ///
    /// Extra keypoints on the longer side are ignored.
    pub fn triangulate_all(&self, left_px: &[Vec2], right_px: &[Vec2]) -> Vec<Landmark3D> {
        left_px
            .iter()
            .zip(right_px)
            .map(|(l, r)| self.triangulate(l.x as f64, l.y as f64, r.x as f64))
            .collect()
    }
}
