//! Configuration file support for pano.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/pano/config.toml` (lowest priority)
//! - Project-local: `.pano.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Name of the project-local config file.
const PROJECT_FILE: &str = ".pano.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Demo dataset location.
    pub demo: DemoConfig,
    /// Video sampling.
    pub video: VideoConfig,
    /// Live capture.
    pub camera: CameraConfig,
    /// File and save dialogs.
    pub dialog: DialogConfig,
    /// Notification channels.
    pub notify: NotifyConfig,
    /// Translation stitcher tuning.
    pub stitch: StitchConfig,
}

/// Demo dataset configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Directory holding one sub-directory per dataset.
    pub root: Option<PathBuf>,
    /// Frame file extension.
    pub extension: Option<String>,
}

/// Video sampling configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Sampling fraction (exclusive 0.0-1.0).
    pub sample_fraction: Option<f64>,
}

/// Live capture configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera device index.
    pub device: Option<u32>,
    /// Key wait per preview frame, in milliseconds.
    pub key_timeout_ms: Option<u64>,
}

/// Dialog configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Directory the dialogs open in.
    pub start_dir: Option<PathBuf>,
}

/// Notification configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Send desktop notifications in addition to console output.
    pub desktop: Option<bool>,
}

/// Translation stitcher configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Minimum overlap between neighbours (0.0-1.0).
    pub min_overlap: Option<f64>,
    /// Largest mean luminance difference accepted (0-255).
    pub max_error: Option<f64>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/pano/config.toml`
    /// 2. Project-local: `.pano.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are reported as
    /// warnings and dropped.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load XDG config (lowest priority)
        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        // Load project-local config (higher priority, merged)
        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        for problem in config.validate() {
            eprintln!("warning: {problem}");
        }

        config
    }

    /// Drop values outside their valid ranges so defaults apply instead.
    ///
    /// Returns one message per dropped value.
    fn validate(&mut self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(f) = self.video.sample_fraction {
            if !(f > 0.0 && f < 1.0) {
                problems.push(format!("video.sample_fraction must be in (0, 1), got {f}"));
                self.video.sample_fraction = None;
            }
        }
        if let Some(o) = self.stitch.min_overlap {
            if !(0.0..=1.0).contains(&o) {
                problems.push(format!("stitch.min_overlap must be 0.0-1.0, got {o}"));
                self.stitch.min_overlap = None;
            }
        }
        if let Some(e) = self.stitch.max_error {
            if !(0.0..=255.0).contains(&e) {
                problems.push(format!("stitch.max_error must be 0-255, got {e}"));
                self.stitch.max_error = None;
            }
        }
        if self.demo.extension.as_deref().is_some_and(str::is_empty) {
            problems.push("demo.extension must not be empty".to_string());
            self.demo.extension = None;
        }

        problems
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Demo
        self.demo.root = other.demo.root.or_else(|| self.demo.root.take());
        self.demo.extension = other.demo.extension.or_else(|| self.demo.extension.take());

        // Video
        self.video.sample_fraction = other.video.sample_fraction.or(self.video.sample_fraction);

        // Camera
        self.camera.device = other.camera.device.or(self.camera.device);
        self.camera.key_timeout_ms = other.camera.key_timeout_ms.or(self.camera.key_timeout_ms);

        // Dialog
        self.dialog.start_dir = other
            .dialog
            .start_dir
            .or_else(|| self.dialog.start_dir.take());

        // Notify
        self.notify.desktop = other.notify.desktop.or(self.notify.desktop);

        // Stitch
        self.stitch.min_overlap = other.stitch.min_overlap.or(self.stitch.min_overlap);
        self.stitch.max_error = other.stitch.max_error.or(self.stitch.max_error);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pano").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.pano.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.demo.root.is_none());
        assert!(config.video.sample_fraction.is_none());
        assert!(config.notify.desktop.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: AppConfig = toml::from_str("").expect("parse empty config");
        assert!(config.camera.device.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[demo]
root = "/srv/demos"
extension = "jpg"

[video]
sample_fraction = 0.05

[camera]
device = 1
key_timeout_ms = 30

[dialog]
start_dir = "/home/me/Pictures"

[notify]
desktop = false

[stitch]
min_overlap = 0.2
max_error = 12.5
"#;
        let config: AppConfig = toml::from_str(toml).expect("parse full config");

        assert_eq!(config.demo.root, Some(PathBuf::from("/srv/demos")));
        assert_eq!(config.demo.extension.as_deref(), Some("jpg"));
        assert_eq!(config.video.sample_fraction, Some(0.05));
        assert_eq!(config.camera.device, Some(1));
        assert_eq!(config.camera.key_timeout_ms, Some(30));
        assert_eq!(config.dialog.start_dir, Some(PathBuf::from("/home/me/Pictures")));
        assert_eq!(config.notify.desktop, Some(false));
        assert_eq!(config.stitch.min_overlap, Some(0.2));
        assert_eq!(config.stitch.max_error, Some(12.5));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config: AppConfig = toml::from_str(
            r"
[video]
sample_fraction = 0.2
codec = 'h264'
",
        )
        .expect("parse config with unknown key");
        assert_eq!(config.video.sample_fraction, Some(0.2));
    }

    #[test]
    fn test_merge_configs() {
        let mut base: AppConfig = toml::from_str(
            r#"
[demo]
root = "/xdg/demos"

[camera]
device = 2
"#,
        )
        .expect("parse base");

        let project: AppConfig = toml::from_str(
            r#"
[demo]
root = "/project/demos"

[notify]
desktop = false
"#,
        )
        .expect("parse override");

        base.merge(project);

        // Demo root overridden
        assert_eq!(base.demo.root, Some(PathBuf::from("/project/demos")));
        // Camera preserved from base
        assert_eq!(base.camera.device, Some(2));
        // Notify added from override
        assert_eq!(base.notify.desktop, Some(false));
    }

    #[test]
    fn test_validate_drops_out_of_range_values() {
        let mut config: AppConfig = toml::from_str(
            r#"
[video]
sample_fraction = 1.0

[stitch]
min_overlap = 0.3
max_error = 300.0

[demo]
extension = ""
"#,
        )
        .expect("parse config");

        let problems = config.validate();

        assert_eq!(problems.len(), 3);
        assert!(config.video.sample_fraction.is_none());
        assert_eq!(config.stitch.min_overlap, Some(0.3));
        assert!(config.stitch.max_error.is_none());
        assert!(config.demo.extension.is_none());
    }

    #[test]
    fn test_find_config_in_parents() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(PROJECT_FILE), "").unwrap();

        assert_eq!(
            find_config_in_parents(&nested),
            Some(root.path().join(PROJECT_FILE))
        );
    }
}
