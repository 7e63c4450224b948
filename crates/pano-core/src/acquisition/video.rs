//! Video sampling: pick evenly spaced frames from a video file.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::domain::ImageSet;
use crate::error::AcquisitionError;
use crate::ports::{CaptureDevices, ProgressEvent, ProgressSink, SeekableStream};

/// Samples roughly `1 / fraction` frames spread across a video.
///
/// Frames between samples are skipped by seeking, never decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoSampler {
    fraction: f64,
}

impl VideoSampler {
    /// Creates a sampler.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::InvalidFraction`] unless `0 < fraction < 1`.
    pub fn new(fraction: f64) -> Result<Self, AcquisitionError> {
        if fraction > 0.0 && fraction < 1.0 {
            Ok(Self { fraction })
        } else {
            Err(AcquisitionError::InvalidFraction(fraction))
        }
    }

    /// Returns the sampling fraction.
    #[must_use]
    pub const fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Distance between sampled frames for a video of `total` frames.
    ///
    /// Never zero, so short videos yield every frame.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn stride(&self, total: usize) -> usize {
        ((total as f64 * self.fraction) as usize).max(1)
    }

    /// Opens `path` and samples it. The video is closed before returning.
    ///
    /// A video that cannot be opened yields an empty set.
    #[must_use]
    pub fn sample(
        &self,
        devices: &dyn CaptureDevices,
        path: &Path,
        progress: &dyn ProgressSink,
    ) -> ImageSet {
        match devices.open_video(path) {
            Ok(mut stream) => self.sample_stream(stream.as_mut(), progress),
            Err(e) => {
                warn!("Failed to open video {}: {e:#}", path.display());
                ImageSet::new()
            }
        }
    }

    /// Samples an already opened stream, starting at frame 0.
    ///
    /// Reads stop at the reported frame count; a stream reporting no frames
    /// is read sequentially until it runs dry.
    #[must_use]
    pub fn sample_stream<S>(&self, stream: &mut S, progress: &dyn ProgressSink) -> ImageSet
    where
        S: SeekableStream + ?Sized,
    {
        let total = stream.frame_count();
        if total == 0 {
            return Self::read_to_end(stream, progress);
        }
        let stride = self.stride(total);
        info!("Sampling video: {total} frames, stride {stride}");

        progress.on_event(ProgressEvent::Started {
            source: "video".to_string(),
            total: Some(total.div_ceil(stride)),
        });

        let mut images = ImageSet::new();
        let mut position = 0usize;

        while position < total {
            if let Err(e) = stream.seek(position) {
                debug!("Stopping at frame {position}: {e:#}");
                break;
            }
            let Some(frame) = stream.read_frame() else {
                debug!("End of stream at frame {position}");
                break;
            };

            progress.on_event(ProgressEvent::Acquired {
                index: images.len(),
                label: frame.source.clone(),
            });
            images.push(frame);
            position += stride;
        }

        progress.on_event(ProgressEvent::Finished {
            acquired: images.len(),
            failed: 0,
        });

        images
    }

    /// Reads every frame of a stream that cannot report its length.
    fn read_to_end<S>(stream: &mut S, progress: &dyn ProgressSink) -> ImageSet
    where
        S: SeekableStream + ?Sized,
    {
        info!("Video reports no frame count, reading every frame");
        progress.on_event(ProgressEvent::Started {
            source: "video".to_string(),
            total: None,
        });

        let mut images = ImageSet::new();
        while let Some(frame) = stream.read_frame() {
            progress.on_event(ProgressEvent::Acquired {
                index: images.len(),
                label: frame.source.clone(),
            });
            images.push(frame);
        }

        progress.on_event(ProgressEvent::Finished {
            acquired: images.len(),
            failed: 0,
        });

        images
    }
}
