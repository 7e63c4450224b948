//! Native capability selection for the current build.
//!
//! The default build is pure Rust: GIF video only, no camera, console
//! dialogs and a headless display. The `opencv` and `desktop` features swap
//! in the full native stack.
//!
//! Only the `desktop` feature provides the system notification channel; a
//! default build notifies on the console alone.

use pano_core::ports::{CaptureDevices, Dialogs, Display, Notifier, Stitcher};
#[cfg(not(feature = "opencv"))]
use pano_adapters::stitch::{DEFAULT_MAX_ERROR, DEFAULT_MIN_OVERLAP};
use tracing::debug;

use crate::config::StitchConfig;

/// The port implementations a run uses.
pub struct Backends {
    pub devices: Box<dyn CaptureDevices>,
    pub display: Box<dyn Display>,
    pub dialogs: Box<dyn Dialogs>,
    pub stitcher: Box<dyn Stitcher>,
    /// Second notification channel next to the console, if built in.
    pub desktop: Option<Box<dyn Notifier>>,
}

impl Backends {
    /// Picks the backends compiled into this binary.
    #[must_use]
    pub fn select(stitch: &StitchConfig) -> Self {
        let (devices, display, stitcher) = native_vision(stitch);
        let (dialogs, desktop) = native_desktop();
        Self {
            devices,
            display,
            dialogs,
            stitcher,
            desktop,
        }
    }
}

type Vision = (Box<dyn CaptureDevices>, Box<dyn Display>, Box<dyn Stitcher>);

#[cfg(feature = "opencv")]
fn native_vision(stitch: &StitchConfig) -> Vision {
    use pano_adapters::{OpencvDevices, OpencvDisplay, OpencvStitcher};

    if stitch.min_overlap.is_some() || stitch.max_error.is_some() {
        debug!("[stitch] settings only apply to the translation stitcher");
    }
    (
        Box::new(OpencvDevices),
        Box::new(OpencvDisplay),
        Box::new(OpencvStitcher),
    )
}

#[cfg(not(feature = "opencv"))]
fn native_vision(stitch: &StitchConfig) -> Vision {
    use pano_adapters::{HeadlessDisplay, NativeDevices, TranslationStitcher};

    let stitcher = TranslationStitcher::new(
        stitch.min_overlap.unwrap_or(DEFAULT_MIN_OVERLAP),
        stitch.max_error.unwrap_or(DEFAULT_MAX_ERROR),
    );
    debug!("Using translation stitcher: {stitcher:?}");
    (
        Box::new(NativeDevices::new()),
        Box::new(HeadlessDisplay),
        Box::new(stitcher),
    )
}

#[cfg(feature = "desktop")]
fn native_desktop() -> (Box<dyn Dialogs>, Option<Box<dyn Notifier>>) {
    use pano_adapters::{DesktopNotifier, NativeDialogs};

    (Box::new(NativeDialogs), Some(Box::new(DesktopNotifier)))
}

#[cfg(not(feature = "desktop"))]
fn native_desktop() -> (Box<dyn Dialogs>, Option<Box<dyn Notifier>>) {
    (Box::new(pano_adapters::ConsoleDialogs::stdio()), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_channel_follows_feature() {
        let backends = Backends::select(&StitchConfig::default());
        assert_eq!(backends.desktop.is_some(), cfg!(feature = "desktop"));
    }

    #[cfg(not(feature = "opencv"))]
    #[test]
    fn test_default_build_uses_translation_stitcher() {
        let backends = Backends::select(&StitchConfig::default());
        assert_eq!(backends.stitcher.name(), "translation");
    }
}
