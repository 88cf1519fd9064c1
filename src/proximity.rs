use nalgebra as na;
use serde::Serialize;

use crate::curve::{Curve, CurveSet};

/// A curve the probe point is currently touching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Collision {
    /// Index of the curve in its [`CurveSet`].
    pub index: usize,
    /// Distance from the probe to the curve, mm.
    pub distance: f64,
    pub thickness: f64,
}

/// Distance from `point` to the closed segment `[p1, p2]`.
pub fn distance_to_segment(
    point: &na::Vector3<f64>,
    p1: &na::Vector3<f64>,
    p2: &na::Vector3<f64>,
) -> f64 {
    let seg = p2 - p1;
    let len2 = seg.norm_squared();
    if len2 == 0.0 {
        return (point - p1).norm();
    }
    let t = ((point - p1).dot(&seg) / len2).clamp(0.0, 1.0);
    (point - (p1 + seg * t)).norm()
}

/// Minimum distance from `point` to the polyline of `curve`.
///
/// Infinite for a curve without points; point-to-point for a single vertex.
pub fn distance_to_curve(point: &na::Vector3<f64>, curve: &Curve) -> f64 {
    match curve.points.as_slice() {
        [] => f64::INFINITY,
        [p] => (point - p).norm(),
        pts => pts
            .windows(2)
            .map(|w| distance_to_segment(point, &w[0], &w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Inclusive: a point exactly `thickness` away is touching.
pub fn is_touching(point: &na::Vector3<f64>, curve: &Curve) -> bool {
    distance_to_curve(point, curve) <= curve.thickness
}

/// Every visible, non-empty curve within touch distance of `point`, nearest
/// first. Ties keep insertion order.
pub fn check_collisions(point: &na::Vector3<f64>, curves: &CurveSet) -> Vec<Collision> {
    let mut collisions: Vec<Collision> = curves
        .iter()
        .enumerate()
        .filter(|(_, c)| c.visible && !c.points.is_empty())
        .filter_map(|(index, c)| {
            let distance = distance_to_curve(point, c);
            if distance <= c.thickness {
                Some(Collision {
                    index,
                    distance,
                    thickness: c.thickness,
                })
            } else {
                None
            }
        })
        .collect();
    // sort_by is stable
    collisions.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    collisions
}
