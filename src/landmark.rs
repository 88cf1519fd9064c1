use glam::Vec2;
use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::types::Camera;

/// The 21 hand keypoints, in the order the detector emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub const COUNT: usize = 21;

    pub const ALL: [HandLandmark; HandLandmark::COUNT] = [
        HandLandmark::Wrist,
        HandLandmark::ThumbCmc,
        HandLandmark::ThumbMcp,
        HandLandmark::ThumbIp,
        HandLandmark::ThumbTip,
        HandLandmark::IndexFingerMcp,
        HandLandmark::IndexFingerPip,
        HandLandmark::IndexFingerDip,
        HandLandmark::IndexFingerTip,
        HandLandmark::MiddleFingerMcp,
        HandLandmark::MiddleFingerPip,
        HandLandmark::MiddleFingerDip,
        HandLandmark::MiddleFingerTip,
        HandLandmark::RingFingerMcp,
        HandLandmark::RingFingerPip,
        HandLandmark::RingFingerDip,
        HandLandmark::RingFingerTip,
        HandLandmark::PinkyMcp,
        HandLandmark::PinkyPip,
        HandLandmark::PinkyDip,
        HandLandmark::PinkyTip,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<HandLandmark> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            HandLandmark::Wrist => "WRIST",
            HandLandmark::ThumbCmc => "THUMB_CMC",
            HandLandmark::ThumbMcp => "THUMB_MCP",
            HandLandmark::ThumbIp => "THUMB_IP",
            HandLandmark::ThumbTip => "THUMB_TIP",
            HandLandmark::IndexFingerMcp => "INDEX_FINGER_MCP",
            HandLandmark::IndexFingerPip => "INDEX_FINGER_PIP",
            HandLandmark::IndexFingerDip => "INDEX_FINGER_DIP",
            HandLandmark::IndexFingerTip => "INDEX_FINGER_TIP",
            HandLandmark::MiddleFingerMcp => "MIDDLE_FINGER_MCP",
            HandLandmark::MiddleFingerPip => "MIDDLE_FINGER_PIP",
            HandLandmark::MiddleFingerDip => "MIDDLE_FINGER_DIP",
            HandLandmark::MiddleFingerTip => "MIDDLE_FINGER_TIP",
            HandLandmark::RingFingerMcp => "RING_FINGER_MCP",
            HandLandmark::RingFingerPip => "RING_FINGER_PIP",
            HandLandmark::RingFingerDip => "RING_FINGER_DIP",
            HandLandmark::RingFingerTip => "RING_FINGER_TIP",
            HandLandmark::PinkyMcp => "PINKY_MCP",
            HandLandmark::PinkyPip => "PINKY_PIP",
            HandLandmark::PinkyDip => "PINKY_DIP",
            HandLandmark::PinkyTip => "PINKY_TIP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Joints from the base of the finger to its tip.
    pub fn joints(self) -> [HandLandmark; 4] {
        let base = match self {
            Finger::Thumb => 1,
            Finger::Index => 5,
            Finger::Middle => 9,
            Finger::Ring => 13,
            Finger::Pinky => 17,
        };
        [
            HandLandmark::ALL[base],
            HandLandmark::ALL[base + 1],
            HandLandmark::ALL[base + 2],
            HandLandmark::ALL[base + 3],
        ]
    }

    pub fn tip(self) -> HandLandmark {
        self.joints()[3]
    }
}

/// Pixel position of a keypoint in one rectified camera image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark2D {
    pub p2d: Vec2,
    pub camera: Camera,
}

/// Triangulated keypoint in the rig frame (mm).
///
/// `valid == false` means the stereo geometry was degenerate for this
/// keypoint; `p3d` is then the zero vector and must not be used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark3D {
    pub p3d: na::Vector3<f64>,
    pub valid: bool,
}

impl Landmark3D {
    pub fn new(p3d: na::Vector3<f64>) -> Landmark3D {
        Landmark3D { p3d, valid: true }
    }

    pub fn invalid() -> Landmark3D {
        Landmark3D {
            p3d: na::Vector3::zeros(),
            valid: false,
        }
    }

    /// The point, if it is usable.
    pub fn position(&self) -> Option<na::Vector3<f64>> {
        if self.valid { Some(self.p3d) } else { None }
    }
}
