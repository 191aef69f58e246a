//! Postcard composition pipeline.
//!
//! Runs the three drawing stages in order, writing each result to disk before
//! the next stage reads it back:
//!
//! ```text
//! 1. Side     template + photo (normalized)     →  side1.jpeg
//! 2. Rotate   rotated template + side1 (↺ 90°)  →  side1-rotated.png
//! 3. Frame    side1-rotated + frame             →  side1-rotated.png
//! ```
//!
//! Stage 2 reads the *encoded* side image back, so JPEG artifacts from stage 1
//! carry into the final card exactly as they would on a printed proof.
//!
//! ## Photo normalization
//!
//! The photo is scaled and center-cropped to the configured slot size (see
//! [`crate::imaging::scale_and_crop`]); `photo.size_check` decides when that
//! happens and when a still-mismatched photo aborts the run.
//!
//! ## Rotation geometry
//!
//! The side image is rotated a quarter turn counter-clockwise about its own
//! integer center and drawn at [`PostcardConfig::rotation_offset`]. The
//! resulting top-left corner on the rotated template comes from
//! [`crate::imaging::rotated_placement`].

use crate::config::{PostcardConfig, resolve_path};
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, NormalizeOutcome, OutputFormat, Placement, Quality,
    ResizeError, Rotation, RustBackend, normalize_photo, plan_normalize, rotated_placement,
    round_corners,
};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Photo rejected: {0}")]
    Photo(#[from] ResizeError),
    #[error("Input image not found: {0}")]
    InputNotFound(PathBuf),
    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(PathBuf),
}

/// Which image a load refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Template,
    Photo,
    RotatedTemplate,
    Frame,
    /// A previous stage's output, read back from disk.
    Intermediate,
}

/// One of the three pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Side,
    Rotated,
    Framed,
}

/// Progress reported while composing.
#[derive(Debug, Clone, PartialEq)]
pub enum ComposeEvent {
    Loaded {
        layer: Layer,
        path: PathBuf,
        dimensions: Dimensions,
    },
    PhotoNormalized(NormalizeOutcome),
    CornersRounded {
        radius: u32,
    },
    Written(WrittenFile),
}

/// A file produced by a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub stage: Stage,
    pub path: PathBuf,
    pub dimensions: Dimensions,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeReport {
    pub photo: NormalizeOutcome,
    pub written: Vec<WrittenFile>,
}

impl ComposeReport {
    /// Path of the finished card.
    pub fn final_output(&self) -> Option<&Path> {
        self.written.last().map(|w| w.path.as_path())
    }
}

/// Compose a postcard using the pure Rust backend.
pub fn compose(
    root: &Path,
    config: &PostcardConfig,
    events: Option<Sender<ComposeEvent>>,
) -> Result<ComposeReport, ComposeError> {
    compose_with_backend(&RustBackend::new(), root, config, events)
}

/// Compose a postcard using a specific backend (allows testing with mock).
pub fn compose_with_backend(
    backend: &impl ImageBackend,
    root: &Path,
    config: &PostcardConfig,
    events: Option<Sender<ComposeEvent>>,
) -> Result<ComposeReport, ComposeError> {
    let pipeline = Pipeline {
        backend,
        root,
        config,
        events,
        written: Vec::new(),
    };
    pipeline.run()
}

/// Scale-and-crop a single image file to the configured photo size.
///
/// Applies the same size check and corner rounding as a full run, then writes
/// the result to `output` in the format its extension names.
pub fn normalize_file(
    backend: &impl ImageBackend,
    input: &Path,
    output: &Path,
    config: &PostcardConfig,
) -> Result<NormalizeOutcome, ComposeError> {
    let format = OutputFormat::from_path(output)
        .ok_or_else(|| ComposeError::UnsupportedOutput(output.to_path_buf()))?;
    if !input.exists() {
        return Err(ComposeError::InputNotFound(input.to_path_buf()));
    }

    let photo = backend.load(input)?;
    let (photo, outcome) = normalize_photo(
        photo,
        config.photo_target(),
        config.photo.size_check,
        config.photo.filter,
    )?;
    let photo = round_corners(photo, config.photo.corner_radius);
    backend.save(
        &photo,
        output,
        format,
        Quality::new(config.encoding.jpeg_quality),
    )?;
    Ok(outcome)
}

/// An input image probed by [`check_with_backend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedInput {
    pub layer: Layer,
    pub path: PathBuf,
    pub dimensions: Dimensions,
}

/// What a compose run would do, worked out from image headers alone.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub inputs: Vec<ProbedInput>,
    pub photo: NormalizeOutcome,
}

/// Validate inputs without decoding pixels or writing anything.
pub fn check(root: &Path, config: &PostcardConfig) -> Result<CheckReport, ComposeError> {
    check_with_backend(&RustBackend::new(), root, config)
}

/// Probe every input and predict the photo normalization.
///
/// Fails on the same conditions a real run would fail on before its first
/// write: a missing or unreadable input, or a photo that cannot be brought to
/// size.
pub fn check_with_backend(
    backend: &impl ImageBackend,
    root: &Path,
    config: &PostcardConfig,
) -> Result<CheckReport, ComposeError> {
    let layers = [
        (Layer::Template, &config.inputs.template),
        (Layer::Photo, &config.inputs.photo),
        (Layer::RotatedTemplate, &config.inputs.rotated_template),
        (Layer::Frame, &config.inputs.frame),
    ];

    let mut inputs = Vec::with_capacity(layers.len());
    for (layer, path) in layers {
        let path = resolve_path(root, path);
        if !path.exists() {
            return Err(ComposeError::InputNotFound(path));
        }
        let dimensions = backend.identify(&path)?;
        inputs.push(ProbedInput {
            layer,
            path,
            dimensions,
        });
    }

    let outcome = plan_normalize(
        inputs[1].dimensions,
        config.photo_target(),
        config.photo.size_check,
    )?;

    Ok(CheckReport {
        inputs,
        photo: outcome,
    })
}

struct Pipeline<'a, B: ImageBackend> {
    backend: &'a B,
    root: &'a Path,
    config: &'a PostcardConfig,
    events: Option<Sender<ComposeEvent>>,
    written: Vec<WrittenFile>,
}

impl<B: ImageBackend> Pipeline<'_, B> {
    fn run(mut self) -> Result<ComposeReport, ComposeError> {
        let config = self.config;

        // Stage 1: photo onto the front template
        let mut side = self.load(Layer::Template, &config.inputs.template)?;
        let photo = self.load(Layer::Photo, &config.inputs.photo)?;
        let (photo, outcome) = normalize_photo(
            photo,
            config.photo_target(),
            config.photo.size_check,
            config.photo.filter,
        )?;
        self.emit(ComposeEvent::PhotoNormalized(outcome));

        let photo = if config.photo.corner_radius > 0 {
            let rounded = round_corners(photo, config.photo.corner_radius);
            self.emit(ComposeEvent::CornersRounded {
                radius: config.photo.corner_radius,
            });
            rounded
        } else {
            photo
        };

        let [photo_x, photo_y] = config.layout.photo_offset;
        self.backend
            .composite(&mut side, &photo, Placement::at(photo_x, photo_y))?;
        drop(photo);
        self.save(Stage::Side, &side, &config.outputs.side)?;
        drop(side);

        // Stage 2: side image rotated onto the rotated template
        let side = self.load(Layer::Intermediate, &config.outputs.side)?;
        let mut card = self.load(Layer::RotatedTemplate, &config.inputs.rotated_template)?;
        let placement = rotated_placement(
            Dimensions::of(&side),
            config.rotation_offset(),
            Rotation::Cw270,
        );
        self.backend.composite(&mut card, &side, placement)?;
        drop(side);
        self.save(Stage::Rotated, &card, &config.outputs.rotated)?;
        drop(card);

        // Stage 3: frame over the rotated card
        let frame = self.load(Layer::Frame, &config.inputs.frame)?;
        let mut card = self.load(Layer::Intermediate, &config.outputs.rotated)?;
        let (frame_x, frame_y) = config.frame_offset();
        self.backend
            .composite(&mut card, &frame, Placement::at(frame_x, frame_y))?;
        self.save(Stage::Framed, &card, &config.outputs.framed)?;

        Ok(ComposeReport {
            photo: outcome,
            written: self.written,
        })
    }

    fn emit(&self, event: ComposeEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is listening
            tx.send(event).ok();
        }
    }

    fn load(&self, layer: Layer, path: &Path) -> Result<RgbaImage, ComposeError> {
        let path = resolve_path(self.root, path);
        let image = self.backend.load(&path).map_err(|e| match e {
            BackendError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                ComposeError::InputNotFound(path.clone())
            }
            other => ComposeError::Imaging(other),
        })?;
        self.emit(ComposeEvent::Loaded {
            layer,
            path,
            dimensions: Dimensions::of(&image),
        });
        Ok(image)
    }

    fn save(
        &mut self,
        stage: Stage,
        image: &RgbaImage,
        path: &Path,
    ) -> Result<(), ComposeError> {
        let path = resolve_path(self.root, path);
        let format = OutputFormat::from_path(&path)
            .ok_or_else(|| ComposeError::UnsupportedOutput(path.clone()))?;
        let quality = Quality::new(self.config.encoding.jpeg_quality);
        self.backend.save(image, &path, format, quality)?;

        let written = WrittenFile {
            stage,
            path,
            dimensions: Dimensions::of(image),
        };
        self.emit(ComposeEvent::Written(written.clone()));
        self.written.push(written);
        Ok(())
    }
}
