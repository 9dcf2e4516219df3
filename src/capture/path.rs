use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

pub const CAPTURE_EXTENSION: &str = "iq";

/// `<data_directory>/<norad>_<downlink>_<YYYYmmddTHHMMSSZ>.iq`
///
/// Separators in the downlink name are replaced so the file always lands
/// directly inside `data_directory`.
pub fn capture_path(
    data_directory: &Path,
    norad: u32,
    downlink: &str,
    start: DateTime<Utc>,
) -> PathBuf {
    let name: String = downlink
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    let timestamp = start.format("%Y%m%dT%H%M%SZ");
    data_directory.join(format!(
        "{}_{}_{}.{}",
        norad, name, timestamp, CAPTURE_EXTENSION
    ))
}
