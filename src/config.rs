//! Postcard configuration module.
//!
//! Handles loading, validating, and merging `postcard.toml`. Stock defaults
//! reproduce the classic postcard run exactly, so an empty (or missing) file
//! is a valid configuration.
//!
//! ## Config File Location
//!
//! `postcard.toml` is read from the root directory (`--root`, default `.`),
//! or from an explicit `--config` path. Every relative path inside it is
//! resolved against the root directory.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [inputs]
//! template = "template-side-1.png"
//! photo = "photo-input.jpg"
//! rotated_template = "template-side-1-rotated.png"
//! frame = "frame.png"
//!
//! [outputs]
//! side = "side1.jpeg"             # Photo on template (JPEG or PNG)
//! rotated = "side1-rotated.png"   # Rotated card (PNG only)
//! framed = "side1-rotated.png"    # Final card with frame (PNG only)
//!
//! [photo]
//! width = 1388
//! height = 1418
//! filter = "lanczos3"             # nearest | triangle | catmull-rom | gaussian | lanczos3
//! size_check = "strict"           # strict | lenient
//! corner_radius = 0               # 0 = square corners
//!
//! [layout]
//! photo_offset = [0, 0]
//! rotation_nudge = [30, 15]
//! # frame_offset = [0, 1388]      # Defaults to [0, photo.width]
//!
//! [encoding]
//! jpeg_quality = 75
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Dimensions, OutputFormat, ResampleFilter, SizeCheck};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Photo width the stock template is laid out for, in pixels.
pub const PHOTO_WIDTH: u32 = 1388;
/// Photo height the stock template is laid out for, in pixels.
pub const PHOTO_HEIGHT: u32 = 1418;

/// File name looked up in the root directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "postcard.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Postcard configuration loaded from `postcard.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostcardConfig {
    /// Source images.
    pub inputs: InputsConfig,
    /// Files written by each stage.
    pub outputs: OutputsConfig,
    /// Photo size and normalization rules.
    pub photo: PhotoConfig,
    /// Layer offsets on the templates.
    pub layout: LayoutConfig,
    /// Encoder settings.
    pub encoding: EncodingConfig,
}

impl PostcardConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.photo.width == 0 || self.photo.height == 0 {
            return Err(ConfigError::Validation(
                "photo.width and photo.height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.encoding.jpeg_quality) {
            return Err(ConfigError::Validation(
                "encoding.jpeg_quality must be 1-100".into(),
            ));
        }
        if OutputFormat::from_path(&self.outputs.side).is_none() {
            return Err(ConfigError::Validation(format!(
                "outputs.side must end in .jpg, .jpeg or .png, got {}",
                self.outputs.side.display()
            )));
        }
        for (key, path) in [
            ("outputs.rotated", &self.outputs.rotated),
            ("outputs.framed", &self.outputs.framed),
        ] {
            if !OutputFormat::from_path(path).is_some_and(OutputFormat::is_lossless) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a .png file, got {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Size every photo is normalized to.
    pub fn photo_target(&self) -> Dimensions {
        Dimensions::new(self.photo.width, self.photo.height)
    }

    /// Draw offset of the side image under rotation.
    ///
    /// Centers the photo on the rotation pivot (the rotated photo's height runs
    /// along x), then applies the nudge.
    pub fn rotation_offset(&self) -> (i64, i64) {
        let [nudge_x, nudge_y] = self.layout.rotation_nudge;
        (
            -((self.photo.height / 2) as i64) + nudge_x,
            -((self.photo.width / 2) as i64) + nudge_y,
        )
    }

    /// Frame offset on the rotated card; below the photo unless overridden.
    pub fn frame_offset(&self) -> (i64, i64) {
        let [x, y] = self
            .layout
            .frame_offset
            .unwrap_or([0, self.photo.width as i64]);
        (x, y)
    }
}

/// Source image paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputsConfig {
    /// Blank front side the photo is placed on.
    pub template: PathBuf,
    /// The photograph.
    pub photo: PathBuf,
    /// Blank rotated card the finished side is placed on.
    pub rotated_template: PathBuf,
    /// Decorative frame drawn last.
    pub frame: PathBuf,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from("template-side-1.png"),
            photo: PathBuf::from("photo-input.jpg"),
            rotated_template: PathBuf::from("template-side-1-rotated.png"),
            frame: PathBuf::from("frame.png"),
        }
    }
}

/// Output paths, one per pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputsConfig {
    pub side: PathBuf,
    pub rotated: PathBuf,
    pub framed: PathBuf,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            side: PathBuf::from("side1.jpeg"),
            rotated: PathBuf::from("side1-rotated.png"),
            framed: PathBuf::from("side1-rotated.png"),
        }
    }
}

/// Photo normalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotoConfig {
    pub width: u32,
    pub height: u32,
    /// Resampling kernel for the scale step.
    pub filter: ResampleFilter,
    /// Whether one matching edge is enough to skip resizing.
    pub size_check: SizeCheck,
    /// Corner radius in pixels (not arc width); 0 keeps square corners.
    pub corner_radius: u32,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            width: PHOTO_WIDTH,
            height: PHOTO_HEIGHT,
            filter: ResampleFilter::default(),
            size_check: SizeCheck::default(),
            corner_radius: 0,
        }
    }
}

/// Layer placement settings, all in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Top-left of the photo on the front template.
    pub photo_offset: [i64; 2],
    /// Correction added to the centered draw offset of the rotated side.
    pub rotation_nudge: [i64; 2],
    /// Top-left of the frame on the rotated card. `None` means `[0, photo.width]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_offset: Option<[i64; 2]>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            photo_offset: [0, 0],
            rotation_nudge: [30, 15],
            frame_offset: None,
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    /// JPEG quality (1 = worst, 100 = best).
    pub jpeg_quality: u32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self { jpeg_quality: 75 }
    }
}

/// Join `path` onto `root` unless it is already absolute.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    root.join(path)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PostcardConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PostcardConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PostcardConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file path.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock config.
pub fn load_config(path: &Path) -> Result<PostcardConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Returns a fully-commented stock `postcard.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Postcard Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Relative paths are resolved against the --root directory.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Source images
# ---------------------------------------------------------------------------
[inputs]
# Front side of the card; the photo is drawn onto it.
template = "template-side-1.png"

# The photograph. Any size works; it is scaled and center-cropped.
photo = "photo-input.jpg"

# Rotated blank card the finished front side is drawn onto.
rotated_template = "template-side-1-rotated.png"

# Decorative frame drawn over the rotated card.
frame = "frame.png"

# ---------------------------------------------------------------------------
# Outputs
# ---------------------------------------------------------------------------
[outputs]
# Photo on the front template. .jpg/.jpeg (alpha dropped) or .png.
side = "side1.jpeg"

# Front side rotated onto the rotated template. Must be .png.
rotated = "side1-rotated.png"

# Final card with the frame on top. Must be .png.
# Defaults to the same file as `rotated`, which is overwritten.
framed = "side1-rotated.png"

# ---------------------------------------------------------------------------
# Photo
# ---------------------------------------------------------------------------
[photo]
# Size the photo slot on the template expects, in pixels.
width = 1388
height = 1418

# Resampling filter: nearest | triangle | catmull-rom | gaussian | lanczos3
filter = "lanczos3"

# strict:  resize and reject when EITHER edge differs from the slot.
# lenient: only when BOTH edges differ; one matching edge passes unscaled.
size_check = "strict"

# Corner radius in pixels (not arc width). 0 keeps corners square.
corner_radius = 0

# ---------------------------------------------------------------------------
# Layout (pixels)
# ---------------------------------------------------------------------------
[layout]
# Top-left of the photo on the front template.
photo_offset = [0, 0]

# Correction applied after centering the front side on the rotation pivot.
rotation_nudge = [30, 15]

# Top-left of the frame on the rotated card.
# Omit to place it directly below the photo: [0, photo.width].
# frame_offset = [0, 1388]

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[encoding]
# JPEG quality (1 = worst, 100 = best).
jpeg_quality = 75
"##
}
