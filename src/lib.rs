//! # Postcard Compose
//!
//! Puts a photograph on a printable postcard: the photo is scaled and
//! center-cropped into the template's photo slot, the finished front side is
//! turned a quarter counter-clockwise onto a rotated card, and a decorative
//! frame is laid over it.
//!
//! # Architecture: Three Drawing Stages
//!
//! ```text
//! 1. Side     template + photo   →  side1.jpeg
//! 2. Rotate   rotated template   →  side1-rotated.png
//! 3. Frame    frame overlay      →  side1-rotated.png
//! ```
//!
//! Each stage writes its result to disk and the next stage reads it back, so
//! every intermediate can be inspected on its own.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compose`] | The pipeline: load, normalize, composite, save; plus dry-run checks |
//! | [`config`] | `postcard.toml` loading, merging over stock defaults, validation |
//! | [`imaging`] | Scale-and-crop, geometry math, and the [`imaging::ImageBackend`] seam |
//! | [`output`] | CLI output formatting for pipeline events |
//!
//! # Design Decisions
//!
//! ## Scale, Then Crop
//!
//! A photo of any size is scaled with its aspect ratio intact until it covers
//! the slot, then the excess is trimmed equally from both sides. Nothing is
//! letterboxed and nothing is stretched. The size computation is in
//! [`imaging::calculate_scale_dimensions`]; a scaled image that somehow fails
//! to cover the slot is an error, never an out-of-bounds crop.
//!
//! ## Strict Size Check by Default
//!
//! A photo counts as the wrong size when either edge differs from the slot.
//! The `lenient` mode, which only reacts when *both* edges differ, is kept for
//! cards laid out against that behavior.
//!
//! ## Backend Trait
//!
//! All decoding, encoding, and blending goes through
//! [`imaging::ImageBackend`]. The pipeline is tested against a recording mock;
//! the production [`imaging::RustBackend`] is plain `image` crate calls.

pub mod compose;
pub mod config;
pub mod imaging;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
