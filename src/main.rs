use clap::{Parser, Subcommand};
use postcard_compose::config::{self, CONFIG_FILE_NAME, PostcardConfig};
use postcard_compose::imaging::RustBackend;
use postcard_compose::{compose, output};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let release = env!("POSTCARD_RELEASE_BUILD");
    if release == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("POSTCARD_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Called once per process
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "postcard-compose")]
#[command(about = "Compose a photo onto a printable postcard")]
#[command(long_about = "\
Compose a photo onto a printable postcard

With no subcommand, runs the full pipeline in the root directory:

  template-side-1.png + photo-input.jpg       → side1.jpeg
  template-side-1-rotated.png + side1 (↺ 90°) → side1-rotated.png
  side1-rotated.png + frame.png               → side1-rotated.png

The photo is scaled and center-cropped to 1388x1418 when its size differs.
File names, photo size, and offsets can be changed in postcard.toml.

Run 'postcard-compose gen-config' to generate a documented postcard.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding the input images; outputs are written here too
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (defaults to <root>/postcard.toml, which may be absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: photo → side → rotated → framed
    Compose,
    /// Scale and crop a single image to the photo size
    Normalize {
        /// Image to normalize, relative to --root
        input: PathBuf,
        /// Where to write the result (.jpg, .jpeg or .png), relative to --root
        output: PathBuf,
    },
    /// Validate config and inputs without writing anything
    Check,
    /// Print a stock postcard.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Compose);

    match command {
        Command::Compose => {
            let config = load_config(&cli.root, cli.config.as_deref())?;
            println!("==> Composing postcard in {}", cli.root.display());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = output::spawn_compose_printer(rx, cli.root.clone());
            let result = compose::compose(&cli.root, &config, Some(tx));
            output::join_printer(printer)?;
            let report = result?;
            if let Some(path) = report.final_output() {
                println!("==> Postcard complete: {}", path.display());
            }
        }
        Command::Normalize {
            input,
            output: target,
        } => {
            let config = load_config(&cli.root, cli.config.as_deref())?;
            let input = config::resolve_path(&cli.root, &input);
            let target = config::resolve_path(&cli.root, &target);
            let outcome = compose::normalize_file(&RustBackend::new(), &input, &target, &config)?;
            output::print_normalize_output(&outcome, &input, &target);
        }
        Command::Check => {
            let config = load_config(&cli.root, cli.config.as_deref())?;
            println!("==> Checking {}", cli.root.display());
            let report = compose::check(&cli.root, &config)?;
            output::print_check_output(&report, &cli.root);
            println!("==> Inputs are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the explicit config file, or `postcard.toml` from the root if present.
fn load_config(
    root: &Path,
    explicit: Option<&Path>,
) -> Result<PostcardConfig, config::ConfigError> {
    match explicit {
        Some(path) if !path.exists() => Err(config::ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file not found: {}", path.display()),
        ))),
        Some(path) => config::load_config(path),
        None => config::load_config(&root.join(CONFIG_FILE_NAME)),
    }
}
