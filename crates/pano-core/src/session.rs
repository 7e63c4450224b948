//! One end-to-end run: acquire, stitch, hand the result to the user.

use tracing::info;

use crate::acquisition::{Acquired, Acquisition};
use crate::domain::{DemoCatalog, RunStatus, SourceSelection};
use crate::error::AcquisitionError;
use crate::pipeline::PanoramaPipeline;
use crate::ports::{
    CaptureDevices, Dialogs, Display, ImageCodec, Notifier, ProgressSink, Stitcher,
};
use crate::settings::Settings;
use crate::workflow::ResultWorkflow;

/// The capabilities a run depends on.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    /// Cameras and video files.
    pub devices: &'a dyn CaptureDevices,
    /// Image decode/encode.
    pub codec: &'a dyn ImageCodec,
    /// Windows and overlays.
    pub display: &'a dyn Display,
    /// File pickers and questions.
    pub dialogs: &'a dyn Dialogs,
    /// User-facing notifications.
    pub notifier: &'a dyn Notifier,
    /// Panorama engine.
    pub stitcher: &'a dyn Stitcher,
    /// Acquisition progress.
    pub progress: &'a dyn ProgressSink,
}

/// Wires acquisition, the pipeline and the result workflow.
pub struct Session<'a> {
    services: Services<'a>,
    catalog: DemoCatalog,
    settings: Settings,
}

impl<'a> Session<'a> {
    /// Creates a session with the built-in demo catalog.
    #[must_use]
    pub fn new(services: Services<'a>, settings: Settings) -> Self {
        Self {
            services,
            catalog: DemoCatalog::builtin(),
            settings,
        }
    }

    /// Replaces the demo catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: DemoCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Runs the whole flow for `selection`.
    ///
    /// # Errors
    ///
    /// Returns an error when the selection itself is unusable (bad sampling
    /// fraction, unknown demo). Every other failure is reported to the user
    /// and ends in [`RunStatus::Failed`].
    pub fn run(&self, selection: SourceSelection) -> Result<RunStatus, AcquisitionError> {
        let acquisition = Acquisition::new(self.services, self.catalog, &self.settings);
        let images = match acquisition.acquire(selection)? {
            Acquired::Exit => return Ok(RunStatus::Exit),
            Acquired::Images(images) => images,
        };

        let workflow = ResultWorkflow::new(
            self.services.display,
            self.services.dialogs,
            self.services.codec,
            self.services.notifier,
            &self.settings.dialog_dir,
        );

        let status = match PanoramaPipeline::new(self.services.stitcher).run(images) {
            Ok(panorama) => workflow.on_success(&panorama),
            Err(e) => workflow.on_failure(&e),
        };

        info!("Run finished: {status:?}");
        Ok(status)
    }
}
