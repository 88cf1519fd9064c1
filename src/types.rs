use serde::{Deserialize, Serialize};
use std::fmt;

/// Which camera of the stereo rig an observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Camera {
    Left,
    Right,
}

/// Handedness label reported by the hand detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => write!(f, "Left"),
            Handedness::Right => write!(f, "Right"),
        }
    }
}

/// 8-bit RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);
