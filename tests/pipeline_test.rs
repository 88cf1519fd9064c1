use glam::Vec2;
use nalgebra as na;
use stereo_hand_haptics::HapticsError;
use stereo_hand_haptics::calibration::StereoCalibration;
use stereo_hand_haptics::config::TrackerConfig;
use stereo_hand_haptics::curve::{Curve, CurveSet};
use stereo_hand_haptics::detected_hands::{DetectedHand, StereoFrame};
use stereo_hand_haptics::haptics::{HapticEvent, SimulatedSink};
use stereo_hand_haptics::landmark::HandLandmark;
use stereo_hand_haptics::pipeline::FramePipeline;
use stereo_hand_haptics::types::{Handedness, Rgb};

const F: f64 = 500.0;
const CX: f64 = 320.0;
const CY: f64 = 240.0;
const BASELINE: f64 = 60.0;

fn calibration() -> StereoCalibration {
    StereoCalibration::rectified(F, CX, CY, BASELINE)
}

/// A right hand whose index fingertip sits at `tip`.
fn frame_with_tip(time_ns: i64, tip: na::Vector3<f64>) -> StereoFrame {
    let tip_idx = HandLandmark::IndexFingerTip.index();
    let points: Vec<na::Vector3<f64>> = (0..HandLandmark::COUNT)
        .map(|i| {
            let k = i as f64 - tip_idx as f64;
            tip + na::Vector3::new(k * 2.0, -k * 3.0, k)
        })
        .collect();
    let config = TrackerConfig::default();
    let (w, h) = (config.image_size.0 as f64, config.image_size.1 as f64);
    let (left, right): (Vec<Vec2>, Vec<Vec2>) = points
        .iter()
        .map(|p| {
            let xl = F * p.x / p.z + CX;
            let xr = F * (p.x - BASELINE) / p.z + CX;
            let y = F * p.y / p.z + CY;
            (
                Vec2::new((xl / w) as f32, (y / h) as f32),
                Vec2::new((xr / w) as f32, (y / h) as f32),
            )
        })
        .unzip();
    StereoFrame {
        time_ns,
        left: vec![DetectedHand {
            handedness: Handedness::Right,
            score: 0.9,
            keypoints: left,
        }],
        right: vec![DetectedHand {
            handedness: Handedness::Right,
            score: 0.9,
            keypoints: right,
        }],
    }
}

fn curves() -> CurveSet {
    let mut curves = CurveSet::new();
    curves.push(Curve::new(
        "near rail",
        vec![na::Vector3::new(-100.0, 5.0, 400.0), na::Vector3::new(100.0, 5.0, 400.0)],
        20.0,
        Rgb(255, 0, 0),
    ));
    curves.push(Curve::new(
        "far rail",
        vec![na::Vector3::new(-100.0, 80.0, 400.0), na::Vector3::new(100.0, 80.0, 400.0)],
        20.0,
        Rgb(0, 255, 0),
    ));
    curves
}

#[test]
fn test_touch_starts_and_stops_once() {
    let mut pipeline = FramePipeline::new(Some(calibration()), TrackerConfig::default());
    let mut sink = SimulatedSink::new();
    let curves = curves();
    let tip = na::Vector3::new(0.0, 0.0, 400.0);

    let first = pipeline.process(&frame_with_tip(0, tip), &curves, &mut sink).unwrap();
    assert_eq!(first.hands.len(), 1);
    let tracked = first.tracked_point.unwrap();
    assert!((tracked - tip).norm() < 0.1, "tracked {:?}", tracked);
    assert_eq!(first.touched.len(), 1);
    assert_eq!(first.touched[0].name, "near rail");
    assert!((first.touched[0].distance - 5.0).abs() < 0.1);
    assert!((first.intensities[0] - 75.0).abs() < 0.5);
    assert_eq!(first.intensities[1], 0.0);
    assert!(matches!(
        first.events.as_slice(),
        [HapticEvent::Started { channel: 0, .. }]
    ));

    let second = pipeline.process(&frame_with_tip(1, tip), &curves, &mut sink).unwrap();
    assert!(second.events.is_empty());

    let third = pipeline.process(&StereoFrame::default(), &curves, &mut sink).unwrap();
    assert!(third.hands.is_empty());
    assert!(third.tracked_point.is_none());
    assert_eq!(third.intensities, vec![0.0, 0.0]);
    assert_eq!(third.events, vec![HapticEvent::Stopped { channel: 0 }]);

    // two channels, three frames
    assert_eq!(sink.commands.len(), 6);
    assert!(pipeline.shutdown(&mut sink).is_empty());
}

#[test]
fn test_two_curves_fill_two_channels() {
    let mut pipeline = FramePipeline::new(Some(calibration()), TrackerConfig::default());
    let mut sink = SimulatedSink::new();
    let mut curves = curves();
    curves.push(Curve::new(
        "second rail",
        vec![na::Vector3::new(-100.0, -10.0, 400.0), na::Vector3::new(100.0, -10.0, 400.0)],
        20.0,
        Rgb(0, 0, 255),
    ));
    let report = pipeline
        .process(&frame_with_tip(0, na::Vector3::new(0.0, 0.0, 400.0)), &curves, &mut sink)
        .unwrap();
    let names: Vec<&str> = report.touched.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["near rail", "second rail"]);
    assert!((report.intensities[0] - 75.0).abs() < 0.5);
    assert!((report.intensities[1] - 50.0).abs() < 0.5);
    assert_eq!(report.events.len(), 2);

    let events = pipeline.shutdown(&mut sink);
    assert_eq!(events.len(), 2);
}

#[test]
fn test_hidden_curve_does_not_touch() {
    let mut pipeline = FramePipeline::new(Some(calibration()), TrackerConfig::default());
    let mut sink = SimulatedSink::new();
    let mut curves = curves();
    curves.set_visible(0, false).unwrap();
    let report = pipeline
        .process(&frame_with_tip(0, na::Vector3::new(0.0, 0.0, 400.0)), &curves, &mut sink)
        .unwrap();
    assert!(report.tracked_point.is_some());
    assert!(report.touched.is_empty());
    assert!(report.events.is_empty());
}

#[test]
fn test_missing_calibration() {
    let mut pipeline = FramePipeline::new(None, TrackerConfig::default());
    let mut sink = SimulatedSink::new();
    let result = pipeline.process(&StereoFrame::default(), &curves(), &mut sink);
    assert!(matches!(result, Err(HapticsError::MissingCalibration)));
    assert!(sink.commands.is_empty());
}
