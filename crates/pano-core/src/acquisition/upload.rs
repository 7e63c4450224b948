//! Static upload: decode a list of files in order.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::domain::{Image, ImageSet};
use crate::ports::{ImageCodec, ProgressEvent, ProgressSink};

/// Decodes an ordered list of paths into an [`ImageSet`].
///
/// Every path yields exactly one entry. A file that fails to decode becomes
/// an invalid placeholder so the set stays aligned with the input list.
pub struct StaticUpload<'a> {
    codec: &'a dyn ImageCodec,
    progress: &'a dyn ProgressSink,
}

impl<'a> StaticUpload<'a> {
    /// Creates an uploader using `codec` for decoding.
    #[must_use]
    pub fn new(codec: &'a dyn ImageCodec, progress: &'a dyn ProgressSink) -> Self {
        Self { codec, progress }
    }

    /// Decodes `paths` in order.
    #[must_use]
    pub fn load(&self, paths: &[PathBuf]) -> ImageSet {
        debug!("Uploading {} image files", paths.len());
        self.progress.on_event(ProgressEvent::Started {
            source: "images".to_string(),
            total: Some(paths.len()),
        });

        let mut images = ImageSet::new();
        let mut failed = 0usize;

        for (index, path) in paths.iter().enumerate() {
            let label = path.display().to_string();
            match self.codec.decode(path) {
                Ok(image) => {
                    self.progress.on_event(ProgressEvent::Acquired { index, label });
                    images.push(image);
                }
                Err(e) => {
                    warn!("Failed to load {label}: {e:#}");
                    self.progress.on_event(ProgressEvent::Failed {
                        index,
                        label: label.clone(),
                        reason: format!("{e:#}"),
                    });
                    images.push(Image::invalid(label, format!("{e:#}")));
                    failed += 1;
                }
            }
        }

        self.progress.on_event(ProgressEvent::Finished {
            acquired: images.len() - failed,
            failed,
        });

        images
    }
}
