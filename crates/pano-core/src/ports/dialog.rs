//! Interactive dialog port.

use std::path::{Path, PathBuf};

/// A named set of file patterns shown by a file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    /// Label shown to the user.
    pub name: String,
    /// Glob-style patterns, e.g. `*` or `*.png`.
    pub patterns: Vec<String>,
}

impl FileFilter {
    /// A filter that accepts every file.
    #[must_use]
    pub fn all_files() -> Self {
        Self {
            name: "All Files".to_string(),
            patterns: vec!["*".to_string()],
        }
    }
}

/// Parameters for a file selection dialog.
#[derive(Debug, Clone)]
pub struct FileSelectRequest {
    /// Prompt or window title.
    pub prompt: String,
    /// Directory the dialog starts in.
    pub start_dir: PathBuf,
    /// Which files are offered.
    pub filter: FileFilter,
    /// Allow picking more than one file.
    pub multiselect: bool,
}

/// Port for user dialogs.
pub trait Dialogs {
    /// Asks the user to pick files. An empty result means nothing was picked.
    fn select_files(&self, request: &FileSelectRequest) -> Vec<PathBuf>;

    /// Asks a yes/no question and waits for the answer.
    fn confirm(&self, title: &str, message: &str) -> bool;

    /// Asks for a destination path. `None` means the user cancelled.
    fn choose_save_path(&self, title: &str, start_dir: &Path) -> Option<PathBuf>;
}
