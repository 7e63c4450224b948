//! CLI argument validation and end-to-end run tests.
//!
//! Every test points `XDG_CONFIG_HOME` at an empty directory and runs from a
//! temp dir so user configuration never leaks in.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::Path;

use assert_cmd::Command;
use pano_test_support::SyntheticImageBuilder;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `pano` command isolated from any config on the machine.
fn pano(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pano").unwrap();
    cmd.current_dir(home.path())
        .env("XDG_CONFIG_HOME", home.path().join("xdg"))
        .env_remove("RUST_LOG");
    cmd
}

/// Writes overlapping views of one scene as `{prefix}-NN.png`.
fn write_views(dir: &Path, prefix: &str, count: u32) -> Vec<String> {
    std::fs::create_dir_all(dir).unwrap();
    SyntheticImageBuilder::overlapping_views(count, 48, 30, 24)
        .into_iter()
        .enumerate()
        .map(|(i, view)| {
            let path = dir.join(format!("{prefix}-{i:02}.png"));
            view.pixels().unwrap().save(&path).unwrap();
            path.display().to_string()
        })
        .collect()
}

// === Argument Tests ===

#[test]
fn test_no_source_prints_usage_hint() {
    let home = tempfile::tempdir().unwrap();
    pano(&home)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Use -h or --help for more information"));
}

#[test]
fn test_help_flag_prints_help() {
    let home = tempfile::tempdir().unwrap();
    pano(&home)
        .arg("-h")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("--camera").and(predicate::str::contains("--demo")));
}

#[test]
fn test_conflicting_sources_rejected() {
    let home = tempfile::tempdir().unwrap();
    pano(&home)
        .args(["--camera", "--select"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_fraction_out_of_range_rejected() {
    let home = tempfile::tempdir().unwrap();
    pano(&home)
        .args(["-v", "clip.gif", "--fraction", "1.5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("1.5 is not in (0, 1)"));
}

#[test]
fn test_unknown_demo_name_rejected() {
    let home = tempfile::tempdir().unwrap();
    pano(&home)
        .args(["-d", "atlantis"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown demo 'atlantis'"));
}

#[test]
fn test_demo_id_out_of_range() {
    let home = tempfile::tempdir().unwrap();
    pano(&home)
        .args(["-d", "42"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_list_demos() {
    let home = tempfile::tempdir().unwrap();
    pano(&home)
        .arg("--list-demos")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("office").and(predicate::str::contains("shanghai")));
}

// === Run Tests ===

#[test]
fn test_single_image_fails() {
    let home = tempfile::tempdir().unwrap();
    let paths = write_views(home.path(), "solo", 1);

    pano(&home)
        .args(["-i", &paths[0]])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Not enough images"));
}

#[test]
fn test_missing_images_fail() {
    let home = tempfile::tempdir().unwrap();
    pano(&home)
        .args(["-i", "missing-a.png,missing-b.png"])
        .assert()
        .code(1);
}

#[test]
fn test_overlapping_images_build_panorama() {
    let home = tempfile::tempdir().unwrap();
    let paths = write_views(home.path(), "view", 2);

    pano(&home)
        .args(["-i", &paths.join(",")])
        .write_stdin("n\n")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Panorama successfully created!"));
}

#[test]
fn test_panorama_saved_where_asked() {
    let home = tempfile::tempdir().unwrap();
    let paths = write_views(home.path(), "view", 3);

    pano(&home)
        .args(["-i", &paths.join(",")])
        .write_stdin("y\nout.png\n")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Panorama saved at:"));

    let saved = image::open(home.path().join("out.png")).unwrap();
    assert_eq!(saved.height(), 24);
    assert_eq!(saved.width(), 48 + 30 * 2);
}

#[test]
fn test_demo_from_custom_root() {
    let home = tempfile::tempdir().unwrap();
    let root = home.path().join("datasets");
    // "example" is the two-frame dataset
    write_views(&root.join("example"), "example", 2);

    pano(&home)
        .args(["-d", "example", "--demo-root"])
        .arg(&root)
        .write_stdin("n\n")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Panorama successfully created!"));
}

#[test]
fn test_camera_unavailable_without_opencv() {
    if cfg!(feature = "opencv") {
        return;
    }
    let home = tempfile::tempdir().unwrap();
    pano(&home).arg("-c").assert().code(1);
}
