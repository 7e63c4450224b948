//! Image codec port.

use std::path::Path;

use crate::domain::Image;

/// Port for decoding and encoding image files.
pub trait ImageCodec {
    /// Decodes the image at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    fn decode(&self, path: &Path) -> anyhow::Result<Image>;

    /// Encodes `image` to `path`; the format follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is a placeholder or cannot be written.
    fn encode(&self, image: &Image, path: &Path) -> anyhow::Result<()>;
}
