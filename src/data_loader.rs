use glob::glob;
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::detected_hands::StereoFrame;
use crate::error::Result;
use crate::io::object_from_json;

/// Parses the timestamp from a file path.
///
/// Assumes the filename (without extension) is a timestamp in nanoseconds.
fn path_to_timestamp(path: &Path) -> Option<i64> {
    path.file_stem()?.to_str()?.parse().ok()
}

/// Loads recorded detector output, one `*.json` [`StereoFrame`] per file.
///
/// Files are parsed in parallel. A frame without `time_ns` takes it from
/// its filename, or from its position in the sorted listing. The result is
/// sorted by timestamp.
pub fn load_stereo_frames(root_folder: &str) -> Result<Vec<StereoFrame>> {
    let mut sorted_path: Vec<PathBuf> = glob(format!("{}/*.json", root_folder).as_str())?
        .filter_map(|p| p.ok())
        .collect();
    sorted_path.sort();
    log::trace!("loading {} frames from {}", sorted_path.len(), root_folder);

    let mut frames = sorted_path
        .par_iter()
        .enumerate()
        .progress_count(sorted_path.len() as u64)
        .map(|(idx, path)| {
            let mut frame: StereoFrame = object_from_json(path)?;
            if frame.time_ns == 0 {
                frame.time_ns = path_to_timestamp(path).unwrap_or(idx as i64 * 100_000_000);
            }
            Ok(frame)
        })
        .collect::<Result<Vec<_>>>()?;
    frames.sort_by_key(|f| f.time_ns);
    Ok(frames)
}
