//! Error types for acquisition and the panorama pipeline.

use thiserror::Error;

/// Acquisition failures that abort a run before any image is read.
///
/// Device and file problems are not errors: they shrink the image set and
/// surface later as a validation failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AcquisitionError {
    /// The video sampling fraction is outside `(0, 1)`.
    #[error("sampling fraction must be in (0, 1), got {0}")]
    InvalidFraction(f64),

    /// The demo id does not name a catalog entry.
    #[error("demo id {id} is out of range (expected 0..{size})")]
    UnknownDemo {
        /// Requested id.
        id: usize,
        /// Number of catalog entries.
        size: usize,
    },
}

/// Reasons the pipeline did not produce a panorama.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Fewer than two images were acquired.
    #[error("Not enough images provided ({count} acquired, at least 2 needed)")]
    InsufficientImages {
        /// Number of images in the set.
        count: usize,
    },

    /// An image in the set could not be decoded.
    #[error("Image {index} could not be loaded: {source_label} ({reason})")]
    InvalidImage {
        /// Position in the set (0-based).
        index: usize,
        /// Where the image came from.
        source_label: String,
        /// Decode failure.
        reason: String,
    },

    /// The stitching engine reported a failure.
    #[error("Panorama could not be created.")]
    StitchFailed {
        /// Engine-specific detail, for logs.
        detail: String,
    },
}
