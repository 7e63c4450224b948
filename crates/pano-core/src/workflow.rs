//! Result workflow: preview, save prompt and status notifications.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::{Image, RunStatus};
use crate::error::PipelineError;
use crate::notification;
use crate::ports::{Dialogs, Display, ImageCodec, Notifier};

/// Title of the result preview window.
pub const PANORAMA_WINDOW: &str = "Panorama";

/// Title of the save confirmation.
pub const SAVE_TITLE: &str = "Save image?";

/// Body of the save confirmation.
pub const SAVE_QUESTION: &str = "Would you like to save the panorama image?";

/// Title of the save location dialog.
pub const SAVE_LOCATION_TITLE: &str = "Choose save location";

/// Message sent when stitching succeeds.
pub const CREATED_MESSAGE: &str = "Panorama successfully created!";

/// Human-in-the-loop handling of a pipeline result.
pub struct ResultWorkflow<'a> {
    display: &'a dyn Display,
    dialogs: &'a dyn Dialogs,
    codec: &'a dyn ImageCodec,
    notifier: &'a dyn Notifier,
    save_dir: PathBuf,
}

impl<'a> ResultWorkflow<'a> {
    /// Creates a workflow; the save dialog starts in `save_dir`.
    #[must_use]
    pub fn new(
        display: &'a dyn Display,
        dialogs: &'a dyn Dialogs,
        codec: &'a dyn ImageCodec,
        notifier: &'a dyn Notifier,
        save_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            display,
            dialogs,
            codec,
            notifier,
            save_dir: save_dir.into(),
        }
    }

    /// Announces the panorama, shows it, then offers to save it.
    #[must_use]
    pub fn on_success(&self, panorama: &Image) -> RunStatus {
        notification::info(self.notifier, CREATED_MESSAGE);

        if let Err(e) = self.display.show(panorama, PANORAMA_WINDOW) {
            warn!("Failed to show panorama: {e:#}");
        }

        if !self.dialogs.confirm(SAVE_TITLE, SAVE_QUESTION) {
            debug!("Save declined");
            return RunStatus::Completed;
        }

        let Some(path) = self
            .dialogs
            .choose_save_path(SAVE_LOCATION_TITLE, &self.save_dir)
            .filter(|p| !p.as_os_str().is_empty())
        else {
            debug!("Save location dialog cancelled");
            return RunStatus::Completed;
        };

        self.save(panorama, &path)
    }

    /// Reports a pipeline failure.
    #[must_use]
    pub fn on_failure(&self, error: &PipelineError) -> RunStatus {
        let message = error.to_string();
        notification::error(self.notifier, &message);
        RunStatus::Failed(message)
    }

    fn save(&self, panorama: &Image, path: &Path) -> RunStatus {
        match self.codec.encode(panorama, path) {
            Ok(()) => {
                info!("Saved panorama to {}", path.display());
                notification::info(
                    self.notifier,
                    &format!("Panorama saved at: {}", path.display()),
                );
                RunStatus::Saved(path.to_path_buf())
            }
            Err(e) => {
                notification::error(
                    self.notifier,
                    &format!("Panorama could not be saved at: {} ({e:#})", path.display()),
                );
                RunStatus::Completed
            }
        }
    }
}
