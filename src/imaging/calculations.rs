//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Rotation;

/// Calculate the intermediate size for a scale-then-crop to `target`.
///
/// Two independent passes, both truncating integer math:
///
/// 1. If the source width differs from the target width, scale the width to
///    the target and the height by the same ratio.
/// 2. If the height is now short of the target, scale the height to the
///    target and derive the width from the *original* source ratio.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height), both non-zero
/// * `target` - Final crop dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Dimensions to resample the source to before cropping
///
/// # Examples
/// ```
/// # use postcard_compose::imaging::calculate_scale_dimensions;
/// // Wide landscape: width pass gives 1388x694, height pass overrides
/// assert_eq!(calculate_scale_dimensions((2000, 1000), (1388, 1418)), (2836, 1418));
///
/// // Exact match is left alone
/// assert_eq!(calculate_scale_dimensions((1388, 1418), (1388, 1418)), (1388, 1418));
/// ```
pub fn calculate_scale_dimensions(source: (u32, u32), target: (u32, u32)) -> (u64, u64) {
    let (start_w, start_h) = (source.0 as u64, source.1 as u64);
    let (target_w, target_h) = (target.0 as u64, target.1 as u64);

    let mut end_w = start_w;
    let mut end_h = start_h;

    if start_w != target_w {
        end_w = target_w;
        end_h = end_w * start_h / start_w;
    }

    if end_h < target_h {
        end_h = target_h;
        end_w = end_h * start_w / start_h;
    }

    (end_w, end_h)
}

/// Calculate the top-left corner of a centered `target` crop within `scaled`.
///
/// Each margin is half the absolute difference, so the result is the same
/// whether the scaled image is larger or smaller than the target. A crop
/// from this origin only fits when `scaled` covers `target`.
pub fn calculate_crop_origin(scaled: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    (
        scaled.0.abs_diff(target.0) / 2,
        scaled.1.abs_diff(target.1) / 2,
    )
}

/// Calculate where a rotated overlay lands on the base image.
///
/// The overlay (`size`) is drawn at `offset` under a rotation about `pivot`,
/// with the y axis pointing down. Returns the top-left corner of the rotated
/// overlay's bounding box in base coordinates, which is what a plain
/// rotate-then-blit needs.
///
/// # Examples
/// ```
/// # use postcard_compose::imaging::{Rotation, calculate_rotated_origin};
/// // Quarter turn counter-clockwise about the center of a 2480x1754 card
/// let origin = calculate_rotated_origin((2480, 1754), (1240, 877), (-679, -679), Rotation::Cw270);
/// assert_eq!(origin, (-316, 316));
/// ```
pub fn calculate_rotated_origin(
    size: (u32, u32),
    pivot: (i64, i64),
    offset: (i64, i64),
    rotation: Rotation,
) -> (i64, i64) {
    let (w, h) = (size.0 as i64, size.1 as i64);
    let (cx, cy) = pivot;
    let (ox, oy) = offset;

    match rotation {
        Rotation::None => (ox, oy),
        Rotation::Cw90 => (cx + cy - oy - h, cy - cx + ox),
        Rotation::Cw180 => (2 * cx - ox - w, 2 * cy - oy - h),
        Rotation::Cw270 => (cx - cy + oy, cx + cy - ox - w),
    }
}

/// Supersampling grid edge used for corner antialiasing.
const CORNER_SAMPLES: u32 = 4;

/// Fraction of pixel `(x, y)` covered by a `width × height` rounded rectangle.
///
/// Pixels away from the corners are fully covered. The radius is clamped to
/// half the shorter edge. Coverage is measured on a
/// `CORNER_SAMPLES × CORNER_SAMPLES` grid inside the pixel.
pub fn rounded_corner_coverage(x: u32, y: u32, (width, height): (u32, u32), radius: u32) -> f32 {
    let radius = radius.min(width / 2).min(height / 2);
    if radius == 0 {
        return 1.0;
    }

    // Distance to the nearest corner circle's center along each axis, or
    // `None` when the pixel sits in a straight-edge band.
    let corner_center_x = if x < radius {
        Some(radius as f32)
    } else if x >= width - radius {
        Some((width - radius) as f32)
    } else {
        None
    };
    let corner_center_y = if y < radius {
        Some(radius as f32)
    } else if y >= height - radius {
        Some((height - radius) as f32)
    } else {
        None
    };

    let (Some(center_x), Some(center_y)) = (corner_center_x, corner_center_y) else {
        return 1.0;
    };

    let r = radius as f32;
    let step = 1.0 / CORNER_SAMPLES as f32;
    let mut inside = 0u32;
    for sy in 0..CORNER_SAMPLES {
        for sx in 0..CORNER_SAMPLES {
            let px = x as f32 + (sx as f32 + 0.5) * step;
            let py = y as f32 + (sy as f32 + 0.5) * step;
            let (dx, dy) = (px - center_x, py - center_y);
            if dx * dx + dy * dy <= r * r {
                inside += 1;
            }
        }
    }
    inside as f32 / (CORNER_SAMPLES * CORNER_SAMPLES) as f32
}

/// Blend a straight-alpha RGBA `src` pixel over `dst` (Porter-Duff source-over).
///
/// Integer math with rounding: `out_a = sa + da * (255 - sa) / 255`, and each
/// colour channel is the alpha-weighted mean of both pixels. A source over an
/// opaque destination always yields alpha 255.
///
/// # Examples
/// ```
/// # use postcard_compose::imaging::blend_source_over;
/// assert_eq!(blend_source_over([0, 0, 255, 255], [0, 255, 0, 128]), [0, 128, 127, 255]);
/// ```
pub fn blend_source_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as u32;
    let da = dst[3] as u32;
    // Weights scaled by 255 so the destination term stays exact
    let src_weight = sa * 255;
    let dst_weight = da * (255 - sa);
    let total = src_weight + dst_weight;
    if total == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let sum = src[c] as u32 * src_weight + dst[c] as u32 * dst_weight;
        out[c] = ((sum + total / 2) / total) as u8;
    }
    out[3] = ((total + 127) / 255) as u8;
    out
}
