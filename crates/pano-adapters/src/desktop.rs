//! Native file pickers, message boxes and desktop notifications.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pano_core::ports::{Dialogs, FileSelectRequest, Notifier, Severity};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

/// Application name reported to the notification daemon.
const APP_NAME: &str = "pano";

/// Dialogs shown with the platform's native widgets.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialogs;

impl Dialogs for NativeDialogs {
    fn select_files(&self, request: &FileSelectRequest) -> Vec<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title(request.prompt.as_str())
            .set_directory(&request.start_dir);

        let extensions: Vec<&str> = request
            .filter
            .patterns
            .iter()
            .filter_map(|p| p.strip_prefix("*."))
            .collect();
        if !extensions.is_empty() {
            dialog = dialog.add_filter(request.filter.name.as_str(), &extensions);
        }

        let picked = if request.multiselect {
            dialog.pick_files()
        } else {
            dialog.pick_file().map(|p| vec![p])
        };
        picked.unwrap_or_default()
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        MessageDialog::new()
            .set_title(title)
            .set_description(message)
            .set_level(MessageLevel::Info)
            .set_buttons(MessageButtons::YesNo)
            .show()
            == MessageDialogResult::Yes
    }

    fn choose_save_path(&self, title: &str, start_dir: &Path) -> Option<PathBuf> {
        FileDialog::new()
            .set_title(title)
            .set_directory(start_dir)
            .save_file()
    }
}

/// Notifications through the desktop notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) -> Result<()> {
        let icon = match severity {
            Severity::Info => "dialog-information",
            Severity::Error => "dialog-error",
        };
        notify_rust::Notification::new()
            .appname(APP_NAME)
            .summary(title)
            .body(message)
            .icon(icon)
            .show()
            .context("Desktop notification failed")?;
        Ok(())
    }
}
