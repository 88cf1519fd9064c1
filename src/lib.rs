//! Stereo hand triangulation and haptic touch detection against virtual
//! 3D graphs.
//!
//! A hand detector supplies per-camera 2D keypoints; [`hand_tracker`] pairs
//! the left/right detections and triangulates them through the rig's
//! reprojection matrix, [`proximity`] measures the tracked fingertip against
//! the [`curve`] set, and [`haptics`] turns touches into per-channel motor
//! intensities.

pub mod calibration;
pub mod command;
pub mod config;
pub mod curve;
pub mod data_loader;
pub mod detected_hands;
pub mod error;
pub mod expression;
pub mod hand_tracker;
pub mod haptics;
pub mod io;
pub mod landmark;
pub mod matching;
pub mod pipeline;
pub mod proximity;
pub mod triangulation;
pub mod types;
pub mod visualization;

pub use error::{HapticsError, Result};
