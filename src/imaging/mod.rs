//! Image processing in pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Load / save** | `image::ImageReader`, JPEG + PNG encoders |
//! | **Scale and crop** | `imageops::resize` + `imageops::crop_imm` |
//! | **Composite** | `imageops::rotate*` + per-pixel source-over |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Scale-and-crop, size normalization, corner masking

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    blend_source_over, calculate_crop_origin, calculate_rotated_origin,
    calculate_scale_dimensions,
};
pub use operations::{
    NormalizeOutcome, ResizeError, normalize_photo, plan_normalize, rotated_placement,
    round_corners, scale_and_crop,
};
pub use params::{OutputFormat, Placement, Quality, ResampleFilter, Rotation, SizeCheck};
pub use rust_backend::RustBackend;
