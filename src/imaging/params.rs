//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. They sit between
//! the [`operations`](super::operations) module (which decides where each
//! layer goes) and the [`backend`](super::backend) (which does the pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 75). Clamped on construction.
//! - [`OutputFormat`]: encoder selection, inferred from the output path extension.
//! - [`ResampleFilter`]: resampling kernel used by the scale step.
//! - [`SizeCheck`]: how strictly a photo's size is compared to the target.
//! - [`Rotation`]: quarter-turn rotation applied to an overlay before blending.
//! - [`Placement`]: final top-left position plus rotation for a composite.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Encoded file format for a saved image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Infer the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Whether the encoder preserves every pixel, alpha included.
    pub fn is_lossless(self) -> bool {
        matches!(self, Self::Png)
    }
}

/// Resampling kernel for the scale step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// How a photo's size is compared against the target.
///
/// `Strict` treats a mismatch in either dimension as wrong. `Lenient` only
/// treats a mismatch in *both* dimensions as wrong, so a photo with one
/// matching edge passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeCheck {
    #[default]
    Strict,
    Lenient,
}

impl SizeCheck {
    /// Whether `actual` counts as the wrong size under this rule.
    pub fn mismatched(self, actual: (u32, u32), expected: (u32, u32)) -> bool {
        let width_off = actual.0 != expected.0;
        let height_off = actual.1 != expected.1;
        match self {
            SizeCheck::Strict => width_off || height_off,
            SizeCheck::Lenient => width_off && height_off,
        }
    }
}

/// Quarter-turn rotation, measured clockwise on screen (y axis pointing down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

/// Where and how an overlay lands on a base image.
///
/// `x`/`y` are the top-left corner of the overlay *after* rotation, in base
/// image coordinates. Either may be negative; the backend clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub rotation: Rotation,
}

impl Placement {
    pub fn at(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            rotation: Rotation::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_matches_jpeg_writer_default() {
        assert_eq!(Quality::default().value(), 75);
    }

    #[test]
    fn output_format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("side1.jpeg")),
            Some(OutputFormat::Jpeg)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out/card.JPG")),
            Some(OutputFormat::Jpeg)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("side1-rotated.png")),
            Some(OutputFormat::Png)
        );
        assert_eq!(OutputFormat::from_path(Path::new("card.webp")), None);
        assert_eq!(OutputFormat::from_path(Path::new("no-extension")), None);
    }

    #[test]
    fn only_png_is_lossless() {
        assert!(OutputFormat::Png.is_lossless());
        assert!(!OutputFormat::Jpeg.is_lossless());
    }

    #[test]
    fn strict_check_flags_any_mismatch() {
        let check = SizeCheck::Strict;
        assert!(!check.mismatched((1388, 1418), (1388, 1418)));
        assert!(check.mismatched((1388, 1000), (1388, 1418)));
        assert!(check.mismatched((1000, 1418), (1388, 1418)));
        assert!(check.mismatched((1000, 1000), (1388, 1418)));
    }

    #[test]
    fn lenient_check_only_flags_both_mismatched() {
        let check = SizeCheck::Lenient;
        assert!(!check.mismatched((1388, 1418), (1388, 1418)));
        assert!(!check.mismatched((1388, 1000), (1388, 1418)));
        assert!(!check.mismatched((1000, 1418), (1388, 1418)));
        assert!(check.mismatched((1000, 1000), (1388, 1418)));
    }

    #[test]
    fn filter_maps_to_image_filter_type() {
        assert_eq!(FilterType::from(ResampleFilter::Nearest), FilterType::Nearest);
        assert_eq!(
            FilterType::from(ResampleFilter::default()),
            FilterType::Lanczos3
        );
    }
}
