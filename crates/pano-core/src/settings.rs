//! Run settings shared by acquisition and the result workflow.

use std::path::PathBuf;
use std::time::Duration;

/// Default fraction of a video's frames used as the sampling stride.
pub const DEFAULT_SAMPLE_FRACTION: f64 = 0.1;

/// Default directory holding the demo datasets.
pub const DEFAULT_DEMO_ROOT: &str = "./demos";

/// Default file extension of demo frames.
pub const DEFAULT_DEMO_EXTENSION: &str = "png";

/// Tunables for one run, resolved from config and CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Camera device index for live capture.
    pub camera_device: u32,
    /// How long each live-capture cycle waits for a key.
    pub key_timeout: Duration,
    /// Video sampling fraction, expected in `(0, 1)`.
    pub sample_fraction: f64,
    /// Root directory of the demo datasets.
    pub demo_root: PathBuf,
    /// File extension of demo frames.
    pub demo_extension: String,
    /// Directory the file and save dialogs start in.
    pub dialog_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_device: 0,
            key_timeout: Duration::from_millis(1),
            sample_fraction: DEFAULT_SAMPLE_FRACTION,
            demo_root: PathBuf::from(DEFAULT_DEMO_ROOT),
            demo_extension: DEFAULT_DEMO_EXTENSION.to_string(),
            dialog_dir: PathBuf::from("./"),
        }
    }
}
