use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::path::Path;

use crate::calibration::StereoCalibration;
use crate::error::Result;

/// Serializes an object to a pretty JSON file.
pub fn object_to_json<T: Serialize, P: AsRef<Path>>(output_path: P, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    std::fs::write(output_path, j)?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned, P: AsRef<Path>>(file_path: P) -> Result<T> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Loads and validates a stereo calibration.
pub fn load_calibration<P: AsRef<Path>>(file_path: P) -> Result<StereoCalibration> {
    let path = file_path.as_ref();
    let calibration: StereoCalibration = object_from_json(path)?;
    calibration.validate()?;
    log::info!(
        "loaded calibration {} (baseline {:.2} mm)",
        path.display(),
        calibration.baseline()
    );
    Ok(calibration)
}

/// Summary of one replay session.
#[derive(Debug, Default, Serialize)]
pub struct SessionReport {
    pub timestamp: String,
    pub frames: usize,
    pub frames_with_hands: usize,
    pub frames_with_touch: usize,
    /// Frames in which each curve (by name) was touched.
    pub touches_per_curve: BTreeMap<String, usize>,
    /// Number of start events per channel.
    pub starts_per_channel: Vec<usize>,
}

pub fn now_timestamp() -> String {
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    now.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

pub fn write_session_report<P: AsRef<Path>>(output_path: P, report: &SessionReport) -> Result<()> {
    object_to_json(output_path, report)
}
