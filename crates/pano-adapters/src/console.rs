//! Terminal adapters: prompts on stdin/stdout, plain-text notifications and
//! a display that renders nothing.

use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{anyhow, bail, Result};
use pano_core::ports::{
    Dialogs, Display, FileSelectRequest, Notifier, PreviewWindow, Severity, TextOverlay,
};
use pano_core::Image;
use tracing::{debug, info, warn};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Dialogs answered on a line-oriented console.
///
/// End of input counts as cancelling every dialog.
pub struct ConsoleDialogs<R, W> {
    io: Mutex<(R, W)>,
}

impl ConsoleDialogs<StdinLock<'static>, Stdout> {
    /// Creates dialogs on the process stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleDialogs<R, W> {
    /// Creates dialogs reading answers from `input` and prompting on `output`.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }

    /// Returns the input and output streams.
    #[must_use]
    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prints `prompt` and reads one trimmed line. `None` on end of input.
    fn ask(&self, prompt: &str) -> Option<String> {
        let mut io = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        let (input, output) = &mut *io;

        if let Err(e) = write!(output, "{prompt}").and_then(|()| output.flush()) {
            warn!("Failed to write prompt: {e}");
            return None;
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!("Failed to read answer: {e}");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> Dialogs for ConsoleDialogs<R, W> {
    fn select_files(&self, request: &FileSelectRequest) -> Vec<PathBuf> {
        let prompt = format!(
            "{} [{}; separate paths with commas, empty to cancel]: ",
            request.prompt, request.filter.name
        );
        let Some(answer) = self.ask(&prompt) else {
            return Vec::new();
        };

        let limit = if request.multiselect { usize::MAX } else { 1 };
        answer
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .take(limit)
            .map(PathBuf::from)
            .collect()
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        self.ask(&format!("{title} {message} [y/N]: "))
            .is_some_and(|a| a.starts_with(&['y', 'Y'][..]))
    }

    fn choose_save_path(&self, title: &str, start_dir: &Path) -> Option<PathBuf> {
        let answer = self.ask(&format!(
            "{title} [relative to {}, empty to cancel]: ",
            start_dir.display()
        ))?;
        if answer.is_empty() {
            return None;
        }
        Some(start_dir.join(answer))
    }
}

/// Notifications printed as `title: message` lines.
///
/// Info goes to the first writer, errors to the second.
pub struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
    err: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl ConsoleNotifier {
    /// Creates a notifier on stdout and stderr, coloured when stdout is a
    /// terminal.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(
            Box::new(io::stdout()),
            Box::new(io::stderr()),
            io::stdout().is_terminal(),
        )
    }

    /// Creates a notifier writing to the given streams.
    #[must_use]
    pub fn new(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
            color,
        }
    }
}

impl Notifier for ConsoleNotifier {
    #[allow(clippy::significant_drop_tightening)]
    fn notify(&self, title: &str, message: &str, severity: Severity) -> Result<()> {
        let (stream, color) = match severity {
            Severity::Info => (&self.out, GREEN),
            Severity::Error => (&self.err, RED),
        };
        let mut writer = stream
            .lock()
            .map_err(|e| anyhow!("Lock poisoned: {e}"))?;

        if self.color {
            writeln!(writer, "{color}{title}:{RESET} {message}")?;
        } else {
            writeln!(writer, "{title}: {message}")?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// A display for machines without a window system.
///
/// Results are logged instead of shown, live previews are unavailable and
/// overlays leave the image unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessDisplay;

impl Display for HeadlessDisplay {
    fn show(&self, image: &Image, label: &str) -> Result<()> {
        info!(
            "{label}: {}x{} image ready (no display backend)",
            image.width, image.height
        );
        Ok(())
    }

    fn open_preview(&self, label: &str) -> Result<Box<dyn PreviewWindow + '_>> {
        bail!("Cannot open '{label}': no display backend (enable the `opencv` feature)")
    }

    fn overlay_text(&self, image: &Image, overlay: &TextOverlay<'_>) -> Image {
        debug!("Skipping overlay '{}' on {}", overlay.text, image.source);
        image.clone()
    }
}
