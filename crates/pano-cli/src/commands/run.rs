//! Run command - acquire images from one source and build a panorama.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::CommandFactory;
use pano_adapters::{is_supported_image, ConsoleNotifier, FsCodec};
use pano_core::notification::Broadcast;
use pano_core::{DemoCatalog, Notifier, RunStatus, Services, Session, Settings, SourceSelection};
use tracing::{debug, info, warn};

use super::{demos, Cli, ExitCode, USAGE_HINT};
use crate::backends::Backends;
use crate::config::AppConfig;
use crate::output::ProgressBar;

/// Resolve run settings: CLI flags over config files over defaults.
fn resolve_settings(cli: &Cli, config: &AppConfig) -> Settings {
    let defaults = Settings::default();
    Settings {
        camera_device: cli
            .camera_device
            .or(config.camera.device)
            .unwrap_or(defaults.camera_device),
        key_timeout: config
            .camera
            .key_timeout_ms
            .map_or(defaults.key_timeout, Duration::from_millis),
        sample_fraction: cli
            .fraction
            .or(config.video.sample_fraction)
            .unwrap_or(defaults.sample_fraction),
        demo_root: cli
            .demo_root
            .clone()
            .or_else(|| config.demo.root.clone())
            .unwrap_or(defaults.demo_root),
        demo_extension: config
            .demo
            .extension
            .clone()
            .unwrap_or(defaults.demo_extension),
        dialog_dir: config
            .dialog
            .start_dir
            .clone()
            .unwrap_or(defaults.dialog_dir),
    }
}

/// Warn about listed files whose extension no decoder handles.
fn warn_unsupported(paths: &[PathBuf]) {
    for path in paths.iter().filter(|p| !is_supported_image(p)) {
        warn!("{} does not look like a supported image", path.display());
    }
}

/// Execute one run and map its status to an exit code.
///
/// # Errors
///
/// Returns an error for unusable selections (unknown demo, bad sampling
/// fraction) and when help cannot be written.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let config = AppConfig::load();
    let settings = resolve_settings(cli, &config);
    debug!("Effective settings: {settings:?}");

    if cli.list_demos {
        let mut stdout = io::stdout().lock();
        demos::list(&DemoCatalog::builtin(), &settings, &mut stdout)?;
        stdout.flush()?;
        return Ok(ExitCode::Success);
    }

    let selection = cli.selection();
    if let SourceSelection::ImageList(paths) = &selection {
        warn_unsupported(paths);
    }

    let backends = Backends::select(&config.stitch);
    let codec = FsCodec::new();
    let console = ConsoleNotifier::stdio();

    let mut notifier = Broadcast::new(vec![&console as &dyn Notifier]);
    if let Some(desktop) = &backends.desktop {
        if cli.no_notify || config.notify.desktop == Some(false) {
            debug!("Desktop notifications disabled");
        } else {
            notifier.push(desktop.as_ref());
        }
    }

    let progress = ProgressBar::new(cli.quiet, io::stderr().is_terminal());

    let services = Services {
        devices: backends.devices.as_ref(),
        codec: &codec,
        display: backends.display.as_ref(),
        dialogs: backends.dialogs.as_ref(),
        notifier: &notifier,
        stitcher: backends.stitcher.as_ref(),
        progress: &progress,
    };

    info!("Starting run: {selection:?}");
    let status = Session::new(services, settings).run(selection.clone())?;

    let code = match status {
        RunStatus::Exit => {
            if selection == SourceSelection::Help {
                Cli::command().print_help().context("Failed to print help")?;
            } else {
                println!("{USAGE_HINT}");
            }
            ExitCode::Success
        }
        RunStatus::Saved(path) => {
            info!("Saved to {}", path.display());
            ExitCode::Success
        }
        RunStatus::Completed => ExitCode::Success,
        RunStatus::Failed(reason) => {
            debug!("Run failed: {reason}");
            ExitCode::Failed
        }
    };

    Ok(code)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pano").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = resolve_settings(&cli(&[]), &AppConfig::default());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_config_over_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[camera]
device = 3
key_timeout_ms = 25

[demo]
root = "/srv/demos"
extension = "jpg"
"#,
        )
        .unwrap();

        let settings = resolve_settings(&cli(&[]), &config);

        assert_eq!(settings.camera_device, 3);
        assert_eq!(settings.key_timeout, Duration::from_millis(25));
        assert_eq!(settings.demo_root, PathBuf::from("/srv/demos"));
        assert_eq!(settings.demo_extension, "jpg");
    }

    #[test]
    fn test_flags_over_config() {
        let config: AppConfig = toml::from_str(
            r#"
[camera]
device = 3

[video]
sample_fraction = 0.2

[demo]
root = "/srv/demos"
"#,
        )
        .unwrap();

        let settings = resolve_settings(
            &cli(&["--camera-device", "1", "--fraction", "0.5", "--demo-root", "here"]),
            &config,
        );

        assert_eq!(settings.camera_device, 1);
        assert!((settings.sample_fraction - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.demo_root, PathBuf::from("here"));
    }
}
