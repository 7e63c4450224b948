//! Panorama pipeline: validate the set, call the engine, interpret the result.

use tracing::{info, warn};

use crate::domain::{Image, ImageSet, StitchOutcome};
use crate::error::PipelineError;
use crate::ports::Stitcher;

/// Minimum number of images a panorama needs.
pub const MIN_IMAGES: usize = 2;

/// Runs one stitching attempt. Failures are terminal: no retries.
pub struct PanoramaPipeline<'a> {
    stitcher: &'a dyn Stitcher,
}

impl<'a> PanoramaPipeline<'a> {
    /// Creates a pipeline around `stitcher`.
    #[must_use]
    pub fn new(stitcher: &'a dyn Stitcher) -> Self {
        Self { stitcher }
    }

    /// Stitches `images` into a panorama.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InsufficientImages`] or
    /// [`PipelineError::InvalidImage`] without calling the engine when the set
    /// is not stitchable, and [`PipelineError::StitchFailed`] when the engine
    /// reports anything but success.
    pub fn run(&self, images: ImageSet) -> Result<Image, PipelineError> {
        validate(&images)?;

        info!(
            "Creating panorama from {} images with {}",
            images.len(),
            self.stitcher.name()
        );

        match self.stitcher.stitch(&images) {
            StitchOutcome::Success(panorama) if panorama.is_valid() => {
                info!("Panorama is {}x{}", panorama.width, panorama.height);
                Ok(panorama)
            }
            StitchOutcome::Success(_) => Err(stitch_failed("engine returned an empty image")),
            outcome => Err(stitch_failed(&outcome.to_string())),
        }
    }
}

/// Checks that `images` can be handed to the stitching engine.
///
/// # Errors
///
/// Returns an error if the set has fewer than [`MIN_IMAGES`] images or holds
/// a placeholder for a file that failed to decode.
pub fn validate(images: &ImageSet) -> Result<(), PipelineError> {
    if images.len() < MIN_IMAGES {
        return Err(PipelineError::InsufficientImages {
            count: images.len(),
        });
    }

    if let Some((index, image)) = images.first_invalid() {
        return Err(PipelineError::InvalidImage {
            index,
            source_label: image.source.clone(),
            reason: image.failure().unwrap_or("invalid image").to_string(),
        });
    }

    Ok(())
}

fn stitch_failed(detail: &str) -> PipelineError {
    warn!("Stitching failed: {detail}");
    PipelineError::StitchFailed {
        detail: detail.to_string(),
    }
}
