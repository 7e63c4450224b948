//! Integration tests for the filesystem codec.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pano_adapters::FsCodec;
use pano_core::ports::ImageCodec;
use pano_test_support::SyntheticImageBuilder;

#[test]
fn test_save_then_load_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pano.png");
    let image = SyntheticImageBuilder::rgb_uniform("panorama", 12, 5, [10, 200, 30]);

    FsCodec::new().encode(&image, &path).expect("should write PNG");
    let loaded = FsCodec::new().decode(&path).expect("should read PNG");

    assert_eq!((loaded.width, loaded.height), (12, 5));
    assert_eq!(loaded.source, path.display().to_string());
    let rgb = loaded.pixels().unwrap().to_rgb8();
    assert_eq!(rgb.get_pixel(3, 3).0, [10, 200, 30]);
}

#[test]
fn test_save_jpeg_drops_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pano.jpg");
    let rgba = image::DynamicImage::new_rgba8(8, 8);
    let image = pano_core::Image::new("panorama", rgba);

    FsCodec::new().encode(&image, &path).expect("should write JPEG");
    assert!(path.exists());
}

#[test]
fn test_save_without_extension_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panorama");
    let image = SyntheticImageBuilder::labelled("panorama", 4, 4);

    FsCodec::new().encode(&image, &path).expect("should write PNG");

    let format = image::ImageFormat::from_extension("png");
    let reader = image::ImageReader::open(&path)
        .unwrap()
        .with_guessed_format()
        .unwrap();
    assert_eq!(reader.format(), format);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = FsCodec::new()
        .decode(&dir.path().join("nope.png"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("nope.png"));
}

#[test]
fn test_load_garbage_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    assert!(FsCodec::new().decode(&path).is_err());
}
