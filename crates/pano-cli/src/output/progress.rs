//! Progress bar adapter using indicatif.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use pano_core::{ProgressEvent, ProgressSink};

/// Progress bar adapter for CLI output.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
    quiet: bool,
}

impl ProgressBar {
    /// Creates a new progress bar.
    ///
    /// The bar is sized when acquisition starts, so nothing is drawn until
    /// the first event.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, suppress all output
    /// * `show_bar` - If true, show progress bar; otherwise show per-item status
    #[must_use]
    pub fn new(quiet: bool, show_bar: bool) -> Self {
        if quiet {
            return Self {
                bar: None,
                quiet: true,
            };
        }

        let bar = if show_bar {
            let bar = IndicatifBar::hidden();
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            ) {
                bar.set_style(style.progress_chars("#>-"));
            }
            Some(bar)
        } else {
            None
        };

        Self { bar, quiet }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        if self.quiet {
            return;
        }

        match event {
            ProgressEvent::Started { source, total } => {
                if let Some(bar) = &self.bar {
                    match total {
                        Some(t) => bar.set_length(t as u64),
                        None => bar.set_style(ProgressStyle::default_spinner()),
                    }
                    bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
                    bar.set_message(source);
                }
            }
            ProgressEvent::Acquired { label, .. } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                    bar.set_message(label);
                }
            }
            ProgressEvent::Failed { label, reason, .. } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                    bar.suspend(|| eprintln!("WARN: Skipping {label}: {reason}"));
                } else {
                    eprintln!("WARN: Skipping {label}: {reason}");
                }
            }
            ProgressEvent::Finished { acquired, failed } => {
                if let Some(bar) = &self.bar {
                    bar.finish_and_clear();
                }
                if failed > 0 {
                    eprintln!("Acquired {acquired} image(s), {failed} unreadable");
                }
            }
        }
    }
}
