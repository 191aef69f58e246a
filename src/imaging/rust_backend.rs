//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (RGB8, alpha dropped) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA8) |
//! | Rotate | `image::imageops::rotate90` / `rotate180` / `rotate270` |
//! | Composite | [`blend_source_over`] per pixel over the clipped overlap |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::blend_source_over;
use super::params::{OutputFormat, Placement, Quality, Rotation};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage, imageops};
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> BackendError {
    BackendError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn encode_error(path: &Path, err: impl std::fmt::Display) -> BackendError {
    BackendError::Encode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn rotate(image: &RgbaImage, rotation: Rotation) -> Cow<'_, RgbaImage> {
    match rotation {
        Rotation::None => Cow::Borrowed(image),
        Rotation::Cw90 => Cow::Owned(imageops::rotate90(image)),
        Rotation::Cw180 => Cow::Owned(imageops::rotate180(image)),
        Rotation::Cw270 => Cow::Owned(imageops::rotate270(image)),
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn load(&self, path: &Path) -> Result<RgbaImage, BackendError> {
        // Sniff the content so a mislabelled extension still decodes
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let decoded = reader.decode().map_err(|e| decode_error(path, e))?;
        Ok(decoded.into_rgba8())
    }

    fn save(
        &self,
        image: &RgbaImage,
        path: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), BackendError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        match format {
            OutputFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
                let encoder = JpegEncoder::new_with_quality(writer, quality.value());
                rgb.write_with_encoder(encoder)
                    .map_err(|e| encode_error(path, e))
            }
            OutputFormat::Png => image
                .write_with_encoder(PngEncoder::new(writer))
                .map_err(|e| encode_error(path, e)),
        }
    }

    fn composite(
        &self,
        base: &mut RgbaImage,
        overlay: &RgbaImage,
        placement: Placement,
    ) -> Result<(), BackendError> {
        let top = rotate(overlay, placement.rotation);
        let (x, y) = (placement.x, placement.y);

        // Overlap of the placed overlay with the base; empty ranges draw nothing
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = (x + top.width() as i64).min(base.width() as i64);
        let y_end = (y + top.height() as i64).min(base.height() as i64);

        for by in y_start..y_end {
            for bx in x_start..x_end {
                let src = top.get_pixel((bx - x) as u32, (by - y) as u32);
                let dst = base.get_pixel_mut(bx as u32, by as u32);
                *dst = Rgba(blend_source_over(dst.0, src.0));
            }
        }
        Ok(())
    }
}
