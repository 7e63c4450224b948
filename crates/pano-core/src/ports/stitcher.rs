//! Stitching engine port.

use crate::domain::{ImageSet, StitchOutcome};

/// Port for the panorama synthesis engine.
pub trait Stitcher {
    /// Returns the name of this engine.
    fn name(&self) -> &'static str;

    /// Composes the ordered set into one panorama.
    fn stitch(&self, images: &ImageSet) -> StitchOutcome;
}
