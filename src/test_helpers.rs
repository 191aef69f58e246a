//! Shared test utilities for the postcard-compose test suite.
//!
//! Builds small solid-color input images in a temp directory so pipeline
//! tests run against real files without shipping binary fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (tmp, config) = setup_small_card(Dimensions::new(40, 50));
//! let report = compose(tmp.path(), &config, None).unwrap();
//! assert_rgb_near(&load(tmp.path().join("side1-rotated.png")), (20, 70), RED);
//! ```

use crate::config::PostcardConfig;
use crate::imaging::Dimensions;
use image::{Rgba, RgbaImage};
use std::path::Path;
use tempfile::TempDir;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Front template size of the small card.
pub const SMALL_TEMPLATE: Dimensions = Dimensions {
    width: 80,
    height: 60,
};
/// Rotated template size of the small card.
pub const SMALL_ROTATED_TEMPLATE: Dimensions = Dimensions {
    width: 60,
    height: 80,
};
/// Frame size of the small card.
pub const SMALL_FRAME: Dimensions = Dimensions {
    width: 60,
    height: 10,
};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a solid-color image; the format follows the file extension.
pub fn write_solid(path: &Path, dims: Dimensions, color: Rgba<u8>) {
    let image = RgbaImage::from_pixel(dims.width, dims.height, color);
    if path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
    {
        image::DynamicImage::ImageRgba8(image)
            .into_rgb8()
            .save(path)
            .unwrap();
    } else {
        image.save(path).unwrap();
    }
}

/// Config for a miniature card: 40x50 photo slot, no rotation nudge.
pub fn small_config() -> PostcardConfig {
    let mut config = PostcardConfig::default();
    config.photo.width = 40;
    config.photo.height = 50;
    config.layout.rotation_nudge = [0, 0];
    config
}

/// Write all four stock-named inputs for the small card into a temp dir.
///
/// Template is white, photo red, rotated template blue, frame green.
pub fn setup_small_card(photo: Dimensions) -> (TempDir, PostcardConfig) {
    let tmp = TempDir::new().unwrap();
    let config = small_config();
    write_solid(
        &tmp.path().join(&config.inputs.template),
        SMALL_TEMPLATE,
        WHITE,
    );
    write_solid(&tmp.path().join(&config.inputs.photo), photo, RED);
    write_solid(
        &tmp.path().join(&config.inputs.rotated_template),
        SMALL_ROTATED_TEMPLATE,
        BLUE,
    );
    write_solid(&tmp.path().join(&config.inputs.frame), SMALL_FRAME, GREEN);
    (tmp, config)
}

/// Decode an image from disk as RGBA8.
pub fn load(path: impl AsRef<Path>) -> RgbaImage {
    image::open(path.as_ref()).unwrap().into_rgba8()
}

// =========================================================================
// Pixel assertions
// =========================================================================

/// Assert a pixel's RGB is within JPEG-noise distance of `expected`.
pub fn assert_rgb_near(image: &RgbaImage, (x, y): (u32, u32), expected: Rgba<u8>) {
    let actual = image.get_pixel(x, y);
    let close = (0..3).all(|c| actual[c].abs_diff(expected[c]) <= 24);
    assert!(
        close,
        "pixel ({x}, {y}) is {:?}, expected about {:?}",
        actual.0, expected.0
    );
}
