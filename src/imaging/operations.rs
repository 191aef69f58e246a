//! High-level image operations.
//!
//! These functions combine the pure [`calculations`](super::calculations)
//! with pixel work on in-memory `RgbaImage`s. The scale-and-crop resizer lives
//! here; file I/O and blending go through the backend.

use super::backend::Dimensions;
use super::calculations::{
    calculate_crop_origin, calculate_rotated_origin, calculate_scale_dimensions,
    rounded_corner_coverage,
};
use super::params::{Placement, ResampleFilter, Rotation, SizeCheck};
use image::{RgbaImage, imageops};
use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResizeError {
    #[error("Image has no pixels ({0})")]
    EmptyImage(Dimensions),
    #[error("Target size must be non-zero, got {0}")]
    InvalidTarget(Dimensions),
    #[error("Scaled image {scaled} does not cover target {target}")]
    Undersized { scaled: Dimensions, target: Dimensions },
    #[error("Wrong size: photo is {actual}, expected {expected}")]
    WrongSize {
        actual: Dimensions,
        expected: Dimensions,
    },
}

/// Result type for resize operations.
pub type Result<T> = std::result::Result<T, ResizeError>;

/// Intermediate size [`scale_and_crop`] resamples to, after every size check.
///
/// Fails when either size is empty or the intermediate would not cover the
/// target, including intermediates too large for a `u32` edge.
fn scaled_size(source: Dimensions, target: Dimensions) -> Result<Dimensions> {
    if source.width == 0 || source.height == 0 {
        return Err(ResizeError::EmptyImage(source));
    }
    if target.width == 0 || target.height == 0 {
        return Err(ResizeError::InvalidTarget(target));
    }

    let (end_w, end_h) = calculate_scale_dimensions(source.as_tuple(), target.as_tuple());
    let scaled = match (u32::try_from(end_w), u32::try_from(end_h)) {
        (Ok(w), Ok(h)) => Dimensions::new(w, h),
        // Only reachable for extreme aspect ratios; report the clamped size
        _ => {
            return Err(ResizeError::Undersized {
                scaled: Dimensions::new(
                    end_w.min(u32::MAX as u64) as u32,
                    end_h.min(u32::MAX as u64) as u32,
                ),
                target,
            });
        }
    };

    if scaled.width < target.width || scaled.height < target.height {
        return Err(ResizeError::Undersized { scaled, target });
    }
    Ok(scaled)
}

/// Scale `image` preserving its aspect ratio, then center-crop to `target`.
///
/// See [`calculate_scale_dimensions`] for how the intermediate size is chosen.
/// An exact-size input goes through with a zero crop margin.
///
/// Fails with [`ResizeError::Undersized`] instead of cropping out of bounds
/// when the intermediate does not cover the target in both dimensions.
pub fn scale_and_crop(
    image: &RgbaImage,
    target: Dimensions,
    filter: ResampleFilter,
) -> Result<RgbaImage> {
    let source = Dimensions::of(image);
    let scaled_dims = scaled_size(source, target)?;

    let scaled = if scaled_dims == source {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(imageops::resize(
            image,
            scaled_dims.width,
            scaled_dims.height,
            filter.into(),
        ))
    };

    let (x, y) = calculate_crop_origin(scaled_dims.as_tuple(), target.as_tuple());
    Ok(imageops::crop_imm(scaled.as_ref(), x, y, target.width, target.height).to_image())
}

/// What [`normalize_photo`] did to the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// Size was accepted as-is.
    Unchanged(Dimensions),
    /// Photo was scaled and cropped.
    Resized { from: Dimensions, to: Dimensions },
}

/// Decide what [`normalize_photo`] will do from the photo's size alone.
///
/// Fails exactly where a real normalization would, so a header probe can
/// predict a run without decoding pixels.
pub fn plan_normalize(
    source: Dimensions,
    target: Dimensions,
    check: SizeCheck,
) -> Result<NormalizeOutcome> {
    if !check.mismatched(source.as_tuple(), target.as_tuple()) {
        return Ok(NormalizeOutcome::Unchanged(source));
    }
    scaled_size(source, target)?;
    Ok(NormalizeOutcome::Resized {
        from: source,
        to: target,
    })
}

/// Bring a photo to `target` size, then verify it.
///
/// The photo is only resized when `check` considers it mismatched, and the
/// same rule decides whether the result is rejected. Under
/// [`SizeCheck::Lenient`] a photo with one matching edge is returned
/// unchanged even though the other edge is off.
pub fn normalize_photo(
    image: RgbaImage,
    target: Dimensions,
    check: SizeCheck,
    filter: ResampleFilter,
) -> Result<(RgbaImage, NormalizeOutcome)> {
    let outcome = plan_normalize(Dimensions::of(&image), target, check)?;
    let image = match outcome {
        NormalizeOutcome::Unchanged(_) => image,
        NormalizeOutcome::Resized { .. } => scale_and_crop(&image, target, filter)?,
    };

    let actual = Dimensions::of(&image);
    if check.mismatched(actual.as_tuple(), target.as_tuple()) {
        return Err(ResizeError::WrongSize {
            actual,
            expected: target,
        });
    }

    Ok((image, outcome))
}

/// Mask `image` to a rounded rectangle with antialiased corners.
///
/// Each pixel keeps its color; its alpha is multiplied by the fraction of the
/// pixel inside the rounded rectangle. A zero radius returns the image as-is.
pub fn round_corners(mut image: RgbaImage, radius: u32) -> RgbaImage {
    if radius == 0 {
        return image;
    }
    let dims = image.dimensions();
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let coverage = rounded_corner_coverage(x, y, dims, radius);
        if coverage < 1.0 {
            pixel[3] = (pixel[3] as f32 * coverage).round() as u8;
        }
    }
    image
}

/// Placement for an overlay drawn at `offset` under a canvas rotation.
///
/// The canvas is rotated about `(width / 2, height / 2)` of the overlay, taken
/// in base coordinates and independent of `offset`.
pub fn rotated_placement(overlay: Dimensions, offset: (i64, i64), rotation: Rotation) -> Placement {
    let pivot = ((overlay.width / 2) as i64, (overlay.height / 2) as i64);
    let (x, y) = calculate_rotated_origin(overlay.as_tuple(), pivot, offset, rotation);
    Placement { x, y, rotation }
}
