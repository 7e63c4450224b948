//! Pure-Rust capture devices: animated GIF video, no camera.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, RgbaImage};
use pano_core::ports::{CaptureDevices, FrameStream, SeekableStream};
use pano_core::Image;
use tracing::debug;

/// Capture devices available without native libraries.
///
/// Videos must be animated GIFs. Cameras need the `opencv` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDevices;

impl NativeDevices {
    /// Creates the pure-Rust device set.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CaptureDevices for NativeDevices {
    fn open_camera(&self, index: u32) -> Result<Box<dyn FrameStream + '_>> {
        bail!("Camera {index} unavailable: this build has no camera backend (enable the `opencv` feature)")
    }

    fn open_video(&self, path: &Path) -> Result<Box<dyn SeekableStream + '_>> {
        Ok(Box::new(GifVideo::open(path)?))
    }
}

/// A decoded animated GIF, readable frame by frame.
pub struct GifVideo {
    label: String,
    frames: Vec<RgbaImage>,
    position: usize,
}

impl GifVideo {
    /// Decodes every frame of the GIF at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, is not a GIF, or is corrupt.
    pub fn open(path: &Path) -> Result<Self> {
        let is_gif = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
        if !is_gif {
            bail!(
                "Unsupported video container: {} (only animated GIF without the `opencv` feature)",
                path.display()
            );
        }

        let file = File::open(path).with_context(|| format!("Failed to open video: {}", path.display()))?;
        let decoder = GifDecoder::new(BufReader::new(file))
            .with_context(|| format!("Failed to read GIF header: {}", path.display()))?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .with_context(|| format!("Failed to decode GIF frames: {}", path.display()))?
            .into_iter()
            .map(image::Frame::into_buffer)
            .collect::<Vec<_>>();

        debug!("Decoded {} frames from {}", frames.len(), path.display());
        Ok(Self {
            label: path.display().to_string(),
            frames,
            position: 0,
        })
    }
}

impl FrameStream for GifVideo {
    fn read_frame(&mut self) -> Option<Image> {
        let frame = self.frames.get(self.position)?;
        let image = Image::new(
            format!("{}@{}", self.label, self.position),
            DynamicImage::ImageRgba8(frame.clone()),
        );
        self.position += 1;
        Some(image)
    }
}

impl SeekableStream for GifVideo {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.frames.len() {
            bail!(
                "Cannot seek to frame {position} of {}",
                self.frames.len()
            );
        }
        self.position = position;
        Ok(())
    }
}
