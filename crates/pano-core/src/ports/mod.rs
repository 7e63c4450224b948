//! Port definitions for hexagonal architecture.
//!
//! These traits are the boundaries between the orchestration core and the
//! native capabilities it drives: cameras and videos, codecs, windows,
//! dialogs, notifications and the stitching engine.

mod capture;
mod codec;
mod dialog;
mod display;
mod notifier;
mod progress;
mod stitcher;

pub use capture::{CaptureDevices, FrameStream, SeekableStream};
pub use codec::ImageCodec;
pub use dialog::{Dialogs, FileFilter, FileSelectRequest};
pub use display::{Display, Key, PreviewWindow, TextOverlay};
pub use notifier::{Notifier, Severity};
pub use progress::{NoProgress, ProgressEvent, ProgressSink};
pub use stitcher::Stitcher;
