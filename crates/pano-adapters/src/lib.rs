//! Pano Adapters - Implementations of the `pano_core` ports.
//!
//! This crate provides adapters for:
//! - Filesystem image codec
//! - Animated GIF video decoding
//! - A translation-only panorama stitcher
//! - Console dialogs, notifications and a headless display
//! - OpenCV camera, video, stitching and windows (`opencv` feature)
//! - Native dialogs and desktop notifications (`desktop` feature)

pub mod console;
pub mod fs;
pub mod stitch;
pub mod video;

#[cfg(feature = "opencv")]
pub mod cv;
#[cfg(feature = "desktop")]
pub mod desktop;

pub use console::{ConsoleDialogs, ConsoleNotifier, HeadlessDisplay};
pub use fs::{is_supported_image, FsCodec};
pub use stitch::TranslationStitcher;
pub use video::{GifVideo, NativeDevices};

#[cfg(feature = "opencv")]
pub use cv::{OpencvDevices, OpencvDisplay, OpencvStitcher};
#[cfg(feature = "desktop")]
pub use desktop::{DesktopNotifier, NativeDialogs};
