//! End-to-end runs of the postcard pipeline against files on disk.
//!
//! Inputs are generated solid-color images and the card layout comes from a
//! `postcard.toml` in the temp root, so these tests cover config loading, the
//! pure Rust backend, and all three drawing stages together.

use image::{Rgba, RgbaImage};
use postcard_compose::compose::{self, ComposeError, ComposeEvent, Stage};
use postcard_compose::config::{self, CONFIG_FILE_NAME, ConfigError};
use postcard_compose::imaging::{Dimensions, NormalizeOutcome};
use std::fs;
use std::path::Path;
use std::sync::mpsc;
use tempfile::TempDir;

const CARD_TOML: &str = r#"
[photo]
width = 30
height = 20
filter = "triangle"

[layout]
rotation_nudge = [0, 0]

[encoding]
jpeg_quality = 95
"#;

fn solid(path: &Path, width: u32, height: u32, color: [u8; 4]) {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    if path.extension().is_some_and(|e| e == "jpg") {
        image::DynamicImage::ImageRgba8(image)
            .into_rgb8()
            .save(path)
            .unwrap();
    } else {
        image.save(path).unwrap();
    }
}

/// Temp root with a 30x20 photo slot and stock input names.
fn card_root(photo: (u32, u32)) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::write(root.join(CONFIG_FILE_NAME), CARD_TOML).unwrap();
    solid(&root.join("template-side-1.png"), 64, 48, [255, 255, 255, 255]);
    solid(&root.join("photo-input.jpg"), photo.0, photo.1, [0, 0, 0, 255]);
    solid(
        &root.join("template-side-1-rotated.png"),
        48,
        64,
        [0, 0, 255, 255],
    );
    // Half-transparent frame so blending is observable
    solid(&root.join("frame.png"), 48, 8, [0, 255, 0, 128]);
    tmp
}

fn dims(path: &Path) -> Dimensions {
    image::image_dimensions(path).unwrap().into()
}

#[test]
fn compose_writes_every_stage() {
    let tmp = card_root((90, 60));
    let root = tmp.path();
    let config = config::load_config(&root.join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(config.photo_target(), Dimensions::new(30, 20));

    let report = compose::compose(root, &config, None).unwrap();

    assert_eq!(
        report.photo,
        NormalizeOutcome::Resized {
            from: Dimensions::new(90, 60),
            to: Dimensions::new(30, 20),
        }
    );
    let stages: Vec<Stage> = report.written.iter().map(|w| w.stage).collect();
    assert_eq!(stages, vec![Stage::Side, Stage::Rotated, Stage::Framed]);
    assert_eq!(dims(&root.join("side1.jpeg")), Dimensions::new(64, 48));

    let final_path = report.final_output().unwrap();
    assert_eq!(final_path, root.join("side1-rotated.png"));
    assert_eq!(dims(final_path), Dimensions::new(48, 64));
}

#[test]
fn frame_is_blended_below_the_photo() {
    let tmp = card_root((30, 20));
    let root = tmp.path();
    let config = config::load_config(&root.join(CONFIG_FILE_NAME)).unwrap();

    compose::compose(root, &config, None).unwrap();

    let card = image::open(root.join("side1-rotated.png"))
        .unwrap()
        .into_rgba8();
    // Frame lands at y = photo width; nothing else covers the far right there
    let framed = card.get_pixel(47, 33);
    assert!(framed[1] > 100, "expected green tint, got {:?}", framed.0);
    assert!(framed[2] > 100, "expected blue to show through, got {:?}", framed.0);
    assert_eq!(framed[3], 255);
}

#[test]
fn events_arrive_in_pipeline_order() {
    let tmp = card_root((30, 20));
    let root = tmp.path();
    let config = config::load_config(&root.join(CONFIG_FILE_NAME)).unwrap();
    let (tx, rx) = mpsc::channel();

    compose::compose(root, &config, Some(tx)).unwrap();

    let written: Vec<Stage> = rx
        .iter()
        .filter_map(|event| match event {
            ComposeEvent::Written(file) => Some(file.stage),
            _ => None,
        })
        .collect();
    assert_eq!(written, vec![Stage::Side, Stage::Rotated, Stage::Framed]);
}

#[test]
fn missing_photo_fails_before_writing() {
    let tmp = card_root((30, 20));
    let root = tmp.path();
    fs::remove_file(root.join("photo-input.jpg")).unwrap();
    let config = config::load_config(&root.join(CONFIG_FILE_NAME)).unwrap();

    let result = compose::compose(root, &config, None);

    assert!(matches!(
        result,
        Err(ComposeError::InputNotFound(path)) if path.ends_with("photo-input.jpg")
    ));
    assert!(!root.join("side1.jpeg").exists());
}

#[test]
fn check_predicts_resize() {
    let tmp = card_root((300, 100));
    let root = tmp.path();
    let config = config::load_config(&root.join(CONFIG_FILE_NAME)).unwrap();

    let report = compose::check(root, &config).unwrap();

    assert_eq!(report.inputs.len(), 4);
    assert_eq!(
        report.photo,
        NormalizeOutcome::Resized {
            from: Dimensions::new(300, 100),
            to: Dimensions::new(30, 20),
        }
    );
    assert!(!root.join("side1.jpeg").exists());
}

#[test]
fn unknown_config_key_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[photo]\nwidht = 10\n").unwrap();

    assert!(matches!(
        config::load_config(&path),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn stock_config_round_trips_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(CONFIG_FILE_NAME);
    fs::write(&path, config::stock_config_toml()).unwrap();

    let loaded = config::load_config(&path).unwrap();

    assert_eq!(loaded, config::PostcardConfig::default());
}
