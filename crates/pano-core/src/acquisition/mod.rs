//! Image acquisition: one frame source per run.
//!
//! The orchestrator dispatches a [`SourceSelection`] to exactly one adapter:
//! - [`LiveCapture`] for the camera
//! - [`VideoSampler`] for video files
//! - [`StaticUpload`] for file lists, file dialogs and demo datasets

mod camera;
mod demo;
mod upload;
mod video;

pub use camera::{CaptureState, LiveCapture, CAMERA_WINDOW, CAPTURE_HINT};
pub use demo::{frame_file_name, DatasetResolver};
pub use upload::StaticUpload;
pub use video::VideoSampler;

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::{DemoCatalog, ImageSet, SourceSelection};
use crate::error::AcquisitionError;
use crate::ports::{FileFilter, FileSelectRequest};
use crate::session::Services;
use crate::settings::Settings;

/// Prompt of the file selection dialog.
pub const SELECT_PROMPT: &str = "Select images to create panorama of";

/// Result of an acquisition.
#[derive(Debug)]
pub enum Acquired {
    /// Images to stitch, possibly fewer than needed.
    Images(ImageSet),
    /// Nothing to do: help was requested or no source was given.
    Exit,
}

/// Dispatches a source selection to its frame source adapter.
pub struct Acquisition<'a> {
    services: Services<'a>,
    catalog: DemoCatalog,
    settings: &'a Settings,
}

impl<'a> Acquisition<'a> {
    /// Creates an orchestrator over the given capabilities.
    #[must_use]
    pub const fn new(services: Services<'a>, catalog: DemoCatalog, settings: &'a Settings) -> Self {
        Self {
            services,
            catalog,
            settings,
        }
    }

    /// Collects images from the selected source.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid sampling fraction or an unknown demo
    /// id. Device and file problems are not errors; they only shrink the set.
    pub fn acquire(&self, selection: SourceSelection) -> Result<Acquired, AcquisitionError> {
        debug!("Acquiring from {}", selection.kind());

        let images = match selection {
            SourceSelection::Help | SourceSelection::None => return Ok(Acquired::Exit),
            SourceSelection::Camera => LiveCapture::new(
                self.services.devices,
                self.services.display,
                self.services.progress,
                self.settings.camera_device,
            )
            .with_key_timeout(self.settings.key_timeout)
            .run(),
            SourceSelection::FileSelect => {
                let paths = self.select_files();
                self.upload(&paths)
            }
            SourceSelection::ImageList(paths) => self.upload(&paths),
            SourceSelection::VideoFile(path) => {
                let sampler = VideoSampler::new(self.settings.sample_fraction)?;
                sampler.sample(self.services.devices, &path, self.services.progress)
            }
            SourceSelection::Demo(id) => {
                let resolver = DatasetResolver::new(
                    self.catalog,
                    &self.settings.demo_root,
                    &self.settings.demo_extension,
                );
                let paths = resolver.resolve(id)?;
                info!(
                    "Loading demo {id} ({} frames) from {}",
                    paths.len(),
                    resolver.root().display()
                );
                self.upload(&paths)
            }
        };

        info!("Acquired {} images", images.len());
        Ok(Acquired::Images(images))
    }

    fn select_files(&self) -> Vec<PathBuf> {
        let request = FileSelectRequest {
            prompt: SELECT_PROMPT.to_string(),
            start_dir: self.settings.dialog_dir.clone(),
            filter: FileFilter::all_files(),
            multiselect: true,
        };
        let paths = self.services.dialogs.select_files(&request);
        if paths.is_empty() {
            warn!("No files selected");
        }
        paths
    }

    fn upload(&self, paths: &[PathBuf]) -> ImageSet {
        StaticUpload::new(self.services.codec, self.services.progress).load(paths)
    }
}
