//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the raster-graphics collaborator the rest of
//! the crate talks to: identify, load, save, and composite. Nothing above this
//! seam touches a codec directly.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{OutputFormat, Placement, Quality};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Every backend must implement all four operations so the pipeline stays
/// backend-agnostic and can run against a recording mock in tests.
pub trait ImageBackend {
    /// Get image dimensions without decoding pixels.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode an image into RGBA8.
    fn load(&self, path: &Path) -> Result<RgbaImage, BackendError>;

    /// Encode an image to disk. JPEG drops the alpha channel.
    fn save(
        &self,
        image: &RgbaImage,
        path: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), BackendError>;

    /// Blend `overlay` onto `base` (source-over) at the given placement.
    ///
    /// The overlay is rotated first; pixels falling outside `base` are clipped.
    fn composite(
        &self,
        base: &mut RgbaImage,
        overlay: &RgbaImage,
        placement: Placement,
    ) -> Result<(), BackendError>;
}
