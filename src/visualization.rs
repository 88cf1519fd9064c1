use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rerun::{RecordingStream, TimeCell};

use crate::curve::CurveSet;
use crate::hand_tracker::HandObservation;
use crate::landmark::Landmark3D;
use crate::types::Rgb;

/// Deterministic bright-ish color for the curve at `id`.
pub fn curve_color(id: usize) -> Rgb {
    let mut rng = ChaCha8Rng::seed_from_u64(id as u64);
    Rgb(
        rng.random_range(50..=255),
        rng.random_range(50..=255),
        rng.random_range(50..=255),
    )
}

/// HSV to 8-bit RGB, channels truncated.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

/// Color for the `n`th recorded equation: hue stepped by 0.17 per entry.
pub fn history_color(n: usize) -> Rgb {
    hsv_to_rgb((n as f64 * 0.17) % 1.0, 0.8, 0.9)
}

fn to_rerun_color(c: Rgb) -> rerun::Color {
    rerun::Color::from_rgb(c.0, c.1, c.2)
}

fn to_f32(lm: &Landmark3D) -> [f32; 3] {
    [lm.p3d.x as f32, lm.p3d.y as f32, lm.p3d.z as f32]
}

pub fn set_frame(recording: &RecordingStream, frame_idx: usize) {
    recording.set_time("frame", TimeCell::from_sequence(frame_idx as i64));
}

/// Logs every visible curve as a 3D line strip under `{topic}/curves/{i}`.
pub fn log_curves(recording: &RecordingStream, topic: &str, curves: &CurveSet) {
    for (i, curve) in curves.iter().enumerate() {
        let path = format!("{}/curves/{}", topic, i);
        let result = if curve.visible && !curve.points.is_empty() {
            let strip: Vec<[f32; 3]> = curve
                .points
                .iter()
                .map(|p| [p.x as f32, p.y as f32, p.z as f32])
                .collect();
            recording.log(
                path.as_str(),
                &rerun::LineStrips3D::new([strip])
                    .with_colors([to_rerun_color(curve.color)])
                    .with_labels([curve.name.as_str()])
                    .with_radii([rerun::Radius::new_scene_units(curve.thickness as f32 / 4.0)]),
            )
        } else {
            recording.log(path.as_str(), &rerun::Clear::flat())
        };
        if let Err(e) = result {
            log::warn!("rerun logging failed for {}: {}", path, e);
        }
    }
}

/// Logs the valid triangulated keypoints of each hand.
pub fn log_hands(recording: &RecordingStream, topic: &str, hands: &[HandObservation]) {
    for (i, hand) in hands.iter().enumerate() {
        let pts: Vec<[f32; 3]> = hand
            .landmarks_3d
            .iter()
            .filter(|lm| lm.valid)
            .map(to_f32)
            .collect();
        let path = format!("{}/hands/{}", topic, i);
        if let Err(e) = recording.log(
            path.as_str(),
            &rerun::Points3D::new(pts)
                .with_radii([rerun::Radius::new_ui_points(4.0)])
                .with_labels([hand.handedness.to_string()]),
        ) {
            log::warn!("rerun logging failed for {}: {}", path, e);
        }
    }
}
