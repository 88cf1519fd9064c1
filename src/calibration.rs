use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::error::{HapticsError, Result};

/// Output of a stereo calibration run.
///
/// Produced once by the external calibration tool and held read-only for the
/// lifetime of a tracking session. All lengths are in the unit the chessboard
/// square size was given in (millimetres throughout this crate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StereoCalibration {
    pub camera_matrix_left: na::Matrix3<f64>,
    pub dist_coeffs_left: Vec<f64>,
    pub camera_matrix_right: na::Matrix3<f64>,
    pub dist_coeffs_right: Vec<f64>,
    /// Rotation from the left to the right camera.
    pub r: na::Matrix3<f64>,
    /// Translation from the left to the right camera.
    pub t: na::Vector3<f64>,
    pub e: na::Matrix3<f64>,
    pub f: na::Matrix3<f64>,
    /// Disparity-to-depth reprojection matrix.
    pub q: na::Matrix4<f64>,
    /// Inner corners of the chessboard, (cols, rows).
    pub chessboard_size: (u32, u32),
    pub square_size_mm: f64,
}

impl StereoCalibration {
    /// A rectified rig with identical pinhole cameras, focal `focal_px`,
    /// principal point `(cx, cy)` and a horizontal baseline of `baseline_mm`.
    ///
    /// The reprojection matrix follows the usual rectified layout
    /// `[1 0 0 -cx; 0 1 0 -cy; 0 0 0 f; 0 0 -1/Tx 0]` with `Tx = -baseline`.
    pub fn rectified(focal_px: f64, cx: f64, cy: f64, baseline_mm: f64) -> StereoCalibration {
        let k = na::Matrix3::new(focal_px, 0.0, cx, 0.0, focal_px, cy, 0.0, 0.0, 1.0);
        let tx = -baseline_mm;
        #[rustfmt::skip]
        let q = na::Matrix4::new(
            1.0, 0.0, 0.0, -cx,
            0.0, 1.0, 0.0, -cy,
            0.0, 0.0, 0.0, focal_px,
            0.0, 0.0, -1.0 / tx, 0.0,
        );
        StereoCalibration {
            camera_matrix_left: k,
            dist_coeffs_left: vec![0.0; 5],
            camera_matrix_right: k,
            dist_coeffs_right: vec![0.0; 5],
            r: na::Matrix3::identity(),
            t: na::Vector3::new(tx, 0.0, 0.0),
            e: na::Matrix3::zeros(),
            f: na::Matrix3::zeros(),
            q,
            chessboard_size: (9, 6),
            square_size_mm: 25.0,
        }
    }

    /// Distance between the two optical centres.
    pub fn baseline(&self) -> f64 {
        self.t.norm()
    }

    pub fn validate(&self) -> Result<()> {
        if self.q.iter().any(|v| !v.is_finite()) {
            return Err(HapticsError::InvalidCalibration(
                "reprojection matrix contains non-finite values".to_string(),
            ));
        }
        if self.q.iter().all(|v| *v == 0.0) {
            return Err(HapticsError::InvalidCalibration(
                "reprojection matrix is all zeros".to_string(),
            ));
        }
        Ok(())
    }

    pub fn summary(&self) -> String {
        let mut s = String::new();
        s += "=== stereo calibration ===\n";
        s += format!("baseline: {:.2} mm\n", self.baseline()).as_str();
        s += format!(
            "chessboard: {}x{}, square {:.1} mm\n",
            self.chessboard_size.0, self.chessboard_size.1, self.square_size_mm
        )
        .as_str();
        s += format!("left camera matrix:{}", self.camera_matrix_left).as_str();
        s += format!("right camera matrix:{}", self.camera_matrix_right).as_str();
        s
    }
}
