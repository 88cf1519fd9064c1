use thiserror::Error;

#[derive(Debug, Error)]
pub enum HapticsError {
    #[error("no stereo calibration loaded, reprojection matrix unavailable")]
    MissingCalibration,
    #[error("invalid stereo calibration: {0}")]
    InvalidCalibration(String),
    #[error("cannot parse expression: {0}")]
    Expression(String),
    #[error("curve index {index} out of range for {len} curves")]
    CurveIndex { index: usize, len: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, HapticsError>;
