use nalgebra as na;
use serde::Serialize;

use crate::calibration::StereoCalibration;
use crate::config::TrackerConfig;
use crate::curve::CurveSet;
use crate::detected_hands::StereoFrame;
use crate::error::Result;
use crate::hand_tracker::{HandObservation, HandTracker};
use crate::haptics::{
    ActuatorSink, HapticController, HapticEvent, distribute_intensities, touch_intensity,
};
use crate::proximity::check_collisions;

#[derive(Debug, Clone, Serialize)]
pub struct TouchedCurve {
    pub index: usize,
    pub name: String,
    pub distance: f64,
    pub intensity: f64,
}

/// Everything that happened while processing one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub time_ns: i64,
    pub hands: Vec<HandObservation>,
    /// Position of the tracked keypoint that drove the haptics.
    pub tracked_point: Option<na::Vector3<f64>>,
    /// Nearest first.
    pub touched: Vec<TouchedCurve>,
    pub intensities: Vec<f64>,
    pub events: Vec<HapticEvent>,
}

/// Detect, triangulate, collide and actuate, one frame at a time.
pub struct FramePipeline {
    tracker: HandTracker,
    haptics: HapticController,
    config: TrackerConfig,
}

impl FramePipeline {
    pub fn new(calibration: Option<StereoCalibration>, config: TrackerConfig) -> FramePipeline {
        let tracker = HandTracker::new(calibration, config.image_size)
            .with_thresholds(config.min_disparity_px, config.hand_match_tolerance);
        FramePipeline {
            tracker,
            haptics: HapticController::new(config.channel_count),
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn tracker(&self) -> &HandTracker {
        &self.tracker
    }

    /// Processes one frame against the current curves.
    ///
    /// The first hand whose tracked keypoint triangulated reliably drives
    /// the channels; with no such hand every channel is sent 0.
    pub fn process(
        &mut self,
        frame: &StereoFrame,
        curves: &CurveSet,
        sink: &mut dyn ActuatorSink,
    ) -> Result<FrameReport> {
        let hands = self.tracker.process_frame(frame)?;
        let tracked_point = hands
            .iter()
            .find_map(|h| h.position(self.config.tracked_landmark));

        let collisions = tracked_point
            .map(|p| check_collisions(&p, curves))
            .unwrap_or_default();
        let intensities = distribute_intensities(&collisions, self.config.channel_count);
        let events = self.haptics.update(&intensities, sink);

        let touched = collisions
            .iter()
            .map(|c| TouchedCurve {
                index: c.index,
                name: curves
                    .get(c.index)
                    .map(|curve| curve.name.clone())
                    .unwrap_or_default(),
                distance: c.distance,
                intensity: touch_intensity(c.distance, c.thickness),
            })
            .collect();

        Ok(FrameReport {
            time_ns: frame.time_ns,
            hands,
            tracked_point,
            touched,
            intensities,
            events,
        })
    }

    pub fn shutdown(&mut self, sink: &mut dyn ActuatorSink) -> Vec<HapticEvent> {
        self.haptics.stop_all(sink)
    }
}
