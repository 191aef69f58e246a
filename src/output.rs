//! CLI output formatting for the compose, check, and normalize commands.
//!
//! # Output Format
//!
//! ## Compose
//!
//! ```text
//! Template
//!     Source: template-side-1.png (2480x1754)
//! Photo
//!     Source: photo-input.jpg (2000x1000)
//!     Resized: 2000x1000 → 1388x1418
//! Side → side1.jpeg (2480x1754)
//! Rotated template
//!     Source: template-side-1-rotated.png (1754x2480)
//! Rotated → side1-rotated.png (1754x2480)
//! Frame
//!     Source: frame.png (1754x300)
//! Framed → side1-rotated.png (1754x2480)
//! ```
//!
//! Intermediate read-backs are not shown; they always match the preceding
//! `→` line.
//!
//! ## Check
//!
//! ```text
//! Inputs
//!     Template: template-side-1.png (2480x1754)
//!     Photo: photo-input.jpg (2000x1000)
//!     Rotated template: template-side-1-rotated.png (1754x2480)
//!     Frame: frame.png (1754x300)
//! Photo will be resized: 2000x1000 → 1388x1418
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::compose::{CheckReport, ComposeEvent, Layer, Stage};
use crate::imaging::NormalizeOutcome;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Show `path` relative to `root` when it lives under it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn layer_label(layer: Layer) -> &'static str {
    match layer {
        Layer::Template => "Template",
        Layer::Photo => "Photo",
        Layer::RotatedTemplate => "Rotated template",
        Layer::Frame => "Frame",
        Layer::Intermediate => "Intermediate",
    }
}

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Side => "Side",
        Stage::Rotated => "Rotated",
        Stage::Framed => "Framed",
    }
}

fn outcome_line(outcome: &NormalizeOutcome) -> String {
    match outcome {
        NormalizeOutcome::Unchanged(dims) => format!("Kept: {dims}"),
        NormalizeOutcome::Resized { from, to } => format!("Resized: {from} \u{2192} {to}"),
    }
}

// ============================================================================
// Compose
// ============================================================================

/// Format a single compose event as zero or more output lines.
pub fn format_compose_event(event: &ComposeEvent, root: &Path) -> Vec<String> {
    match event {
        ComposeEvent::Loaded {
            layer: Layer::Intermediate,
            ..
        } => Vec::new(),
        ComposeEvent::Loaded {
            layer,
            path,
            dimensions,
        } => vec![
            layer_label(*layer).to_string(),
            format!(
                "{}Source: {} ({})",
                indent(1),
                display_path(path, root),
                dimensions
            ),
        ],
        ComposeEvent::PhotoNormalized(outcome) => {
            vec![format!("{}{}", indent(1), outcome_line(outcome))]
        }
        ComposeEvent::CornersRounded { radius } => {
            vec![format!("{}Corners: {}px radius", indent(1), radius)]
        }
        ComposeEvent::Written(file) => vec![format!(
            "{} \u{2192} {} ({})",
            stage_label(file.stage),
            display_path(&file.path, root),
            file.dimensions
        )],
    }
}

/// Print compose events on a background thread until every sender is dropped.
pub fn spawn_compose_printer(rx: Receiver<ComposeEvent>, root: PathBuf) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for event in rx {
            for line in format_compose_event(&event, &root) {
                println!("{}", line);
            }
        }
    })
}

/// Wait for a printer thread, turning a panic into an error message.
pub fn join_printer(printer: JoinHandle<()>) -> Result<(), String> {
    printer.join().map_err(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown cause".to_string());
        format!("output printer panicked: {message}")
    })
}

// ============================================================================
// Check
// ============================================================================

/// Format the result of a dry-run check.
pub fn format_check_output(report: &CheckReport, root: &Path) -> Vec<String> {
    let mut lines = vec!["Inputs".to_string()];
    for input in &report.inputs {
        lines.push(format!(
            "{}{}: {} ({})",
            indent(1),
            layer_label(input.layer),
            display_path(&input.path, root),
            input.dimensions
        ));
    }
    lines.push(match &report.photo {
        NormalizeOutcome::Unchanged(dims) => format!("Photo fits as-is: {dims}"),
        NormalizeOutcome::Resized { from, to } => {
            format!("Photo will be resized: {from} \u{2192} {to}")
        }
    });
    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &CheckReport, root: &Path) {
    for line in format_check_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Normalize
// ============================================================================

/// Format the result of normalizing a single file.
pub fn format_normalize_output(outcome: &NormalizeOutcome, input: &Path, output: &Path) -> Vec<String> {
    vec![
        format!("{} \u{2192} {}", input.display(), output.display()),
        format!("{}{}", indent(1), outcome_line(outcome)),
    ]
}

/// Print normalize output to stdout.
pub fn print_normalize_output(outcome: &NormalizeOutcome, input: &Path, output: &Path) {
    for line in format_normalize_output(outcome, input, output) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ProbedInput, WrittenFile};
    use crate::imaging::Dimensions;
    use std::path::PathBuf;

    fn root() -> &'static Path {
        Path::new("/cards")
    }

    #[test]
    fn display_path_strips_root() {
        assert_eq!(
            display_path(Path::new("/cards/side1.jpeg"), root()),
            "side1.jpeg"
        );
        assert_eq!(
            display_path(Path::new("/elsewhere/frame.png"), root()),
            "/elsewhere/frame.png"
        );
    }

    #[test]
    fn loaded_event_shows_layer_and_source() {
        let event = ComposeEvent::Loaded {
            layer: Layer::Photo,
            path: PathBuf::from("/cards/photo-input.jpg"),
            dimensions: Dimensions::new(2000, 1000),
        };
        assert_eq!(
            format_compose_event(&event, root()),
            vec!["Photo", "    Source: photo-input.jpg (2000x1000)"]
        );
    }

    #[test]
    fn intermediate_loads_are_silent() {
        let event = ComposeEvent::Loaded {
            layer: Layer::Intermediate,
            path: PathBuf::from("/cards/side1.jpeg"),
            dimensions: Dimensions::new(2480, 1754),
        };
        assert!(format_compose_event(&event, root()).is_empty());
    }

    #[test]
    fn normalized_event_shows_resize() {
        let event = ComposeEvent::PhotoNormalized(NormalizeOutcome::Resized {
            from: Dimensions::new(2000, 1000),
            to: Dimensions::new(1388, 1418),
        });
        assert_eq!(
            format_compose_event(&event, root()),
            vec!["    Resized: 2000x1000 \u{2192} 1388x1418"]
        );
    }

    #[test]
    fn normalized_event_shows_kept_size() {
        let event = ComposeEvent::PhotoNormalized(NormalizeOutcome::Unchanged(Dimensions::new(
            1388, 1418,
        )));
        assert_eq!(
            format_compose_event(&event, root()),
            vec!["    Kept: 1388x1418"]
        );
    }

    #[test]
    fn corners_event() {
        assert_eq!(
            format_compose_event(&ComposeEvent::CornersRounded { radius: 12 }, root()),
            vec!["    Corners: 12px radius"]
        );
    }

    #[test]
    fn written_event_shows_stage_and_target() {
        let event = ComposeEvent::Written(WrittenFile {
            stage: Stage::Rotated,
            path: PathBuf::from("/cards/side1-rotated.png"),
            dimensions: Dimensions::new(1754, 2480),
        });
        assert_eq!(
            format_compose_event(&event, root()),
            vec!["Rotated \u{2192} side1-rotated.png (1754x2480)"]
        );
    }

    #[test]
    fn check_output_lists_inputs_and_plan() {
        let report = CheckReport {
            inputs: vec![
                ProbedInput {
                    layer: Layer::Template,
                    path: PathBuf::from("/cards/template-side-1.png"),
                    dimensions: Dimensions::new(2480, 1754),
                },
                ProbedInput {
                    layer: Layer::Photo,
                    path: PathBuf::from("/cards/photo-input.jpg"),
                    dimensions: Dimensions::new(1388, 1418),
                },
            ],
            photo: NormalizeOutcome::Unchanged(Dimensions::new(1388, 1418)),
        };

        assert_eq!(
            format_check_output(&report, root()),
            vec![
                "Inputs",
                "    Template: template-side-1.png (2480x1754)",
                "    Photo: photo-input.jpg (1388x1418)",
                "Photo fits as-is: 1388x1418",
            ]
        );
    }

    #[test]
    fn normalize_output() {
        let outcome = NormalizeOutcome::Resized {
            from: Dimensions::new(10, 10),
            to: Dimensions::new(4, 5),
        };
        assert_eq!(
            format_normalize_output(&outcome, Path::new("in.jpg"), Path::new("out.png")),
            vec!["in.jpg \u{2192} out.png", "    Resized: 10x10 \u{2192} 4x5"]
        );
    }

    #[test]
    fn printer_drains_until_sender_drops() {
        let (tx, rx) = std::sync::mpsc::channel();
        let printer = spawn_compose_printer(rx, PathBuf::from("/cards"));
        tx.send(ComposeEvent::CornersRounded { radius: 3 }).unwrap();
        drop(tx);

        assert_eq!(join_printer(printer), Ok(()));
    }

    #[test]
    fn printer_panic_becomes_error() {
        let printer: JoinHandle<()> = std::thread::spawn(|| panic!("stdout closed"));

        let err = join_printer(printer).unwrap_err();

        assert!(err.contains("stdout closed"), "{err}");
    }
}
