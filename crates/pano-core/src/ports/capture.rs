//! Device capture port for cameras and video files.

use std::path::Path;

use crate::domain::Image;

/// An open stream of frames.
///
/// Dropping the stream releases the underlying device or file.
pub trait FrameStream {
    /// Reads the next frame, or `None` at end of stream.
    fn read_frame(&mut self) -> Option<Image>;
}

/// A frame stream with random access, such as a video file.
pub trait SeekableStream: FrameStream {
    /// Total number of frames reported by the container.
    fn frame_count(&self) -> usize;

    /// Moves the read position to `position` (0-based frame index).
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot seek to that position.
    fn seek(&mut self, position: usize) -> anyhow::Result<()>;
}

/// Port for opening capture devices.
pub trait CaptureDevices {
    /// Opens the camera with the given device index.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is missing or busy.
    fn open_camera(&self, index: u32) -> anyhow::Result<Box<dyn FrameStream + '_>>;

    /// Opens a video file for sampling.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or has no video stream.
    fn open_video(&self, path: &Path) -> anyhow::Result<Box<dyn SeekableStream + '_>>;
}
