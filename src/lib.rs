//! Sketchport: from hand-drawn UI sketches to Flutter projects.
//!
//! A detector reports the components drawn on a sketch as pixel boxes. The
//! interpreter turns those boxes into a typed, resolution-independent
//! design (the IR), and the code generator turns the IR into a Flutter
//! source tree that the packager zips together with a project skeleton.
//!
//! ```text
//! sketch -> [detector] -> boxes -> interpret -> Project (IR) -> codegen -> package -> .zip
//! ```
//!
//! # Modules
//!
//! - [`ir`]: Design model types (Project, Screen, Element, prop records)
//! - [`validation`]: Project validation and issue reporting
//! - [`interpret`]: Detector payloads to IR elements
//! - [`codegen`]: IR to Dart source files
//! - [`package`]: Skeleton copy and zip export
//! - [`config`]: Optional YAML configuration
//! - [`error`]: Error types and their machine-readable kinds

pub mod codegen;
pub mod config;
pub mod error;
pub mod interpret;
pub mod ir;
pub mod package;
pub mod validation;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
pub use error::{ErrorKind, SketchportError};
use interpret::{InterpretOptions, PayloadFileDetector};
use ir::{DeviceProfile, Project};

/// The sketchport CLI application.
#[derive(Parser)]
#[command(name = "sketchport")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log debug detail to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML config file with skeleton dir, work dir, deny list and font policy.
    #[arg(long, global = true, env = "SKETCHPORT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate a project document for errors and warnings.
    Validate(ValidateArgs),
    /// Interpret a detector payload into a screen and add it to a project.
    Interpret(InterpretArgs),
    /// Generate the Flutter source tree of a project into a directory.
    Generate(GenerateArgs),
    /// Export a project as a zipped Flutter project.
    Export(ExportArgs),
}

/// Report format for `validate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Project document to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

/// Arguments for the interpret subcommand.
#[derive(clap::Args)]
struct InterpretArgs {
    /// Detector payload (`{"boxes": [...]}`) captured for the sketch.
    #[arg(long)]
    payload: PathBuf,

    /// Sketch image; its dimensions scale the payload boxes.
    #[arg(long, conflicts_with_all = ["width", "height"])]
    image: Option<PathBuf>,

    /// Sketch width in pixels, when no image is given.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Sketch height in pixels, when no image is given.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Name of the new screen.
    #[arg(long, default_value = "Home")]
    screen_name: String,

    /// Navigation target for absorbed menu items, in order (repeatable).
    #[arg(long = "target")]
    targets: Vec<String>,

    /// Existing project to add the screen to; a new project is created otherwise.
    #[arg(long)]
    project: Option<PathBuf>,

    /// Device profile of a new project.
    #[arg(long, default_value = "mobile")]
    device: DeviceProfile,

    /// Where to write the project document (stdout when omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Arguments for the generate subcommand.
#[derive(clap::Args)]
struct GenerateArgs {
    /// Project document to generate from.
    input: PathBuf,

    /// Directory to write `lib/` into.
    #[arg(short, long)]
    output: PathBuf,
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Project document to export.
    input: PathBuf,

    /// Flutter project skeleton directory.
    #[arg(long, env = "SKETCHPORT_SKELETON")]
    skeleton: Option<PathBuf>,

    /// Directory for per-export working files.
    #[arg(long, env = "SKETCHPORT_WORK_DIR")]
    work_dir: Option<PathBuf>,

    /// Archive name (defaults to the project name).
    #[arg(long)]
    name: Option<String>,

    /// Archive path (defaults to the archive name in the current directory).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Run the sketchport CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SketchportError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Interpret(args)) => run_interpret(args, &config),
        Some(Commands::Generate(args)) => run_generate(args),
        Some(Commands::Export(args)) => run_export(args, &config),
        None => {
            println!("sketchport {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("From hand-drawn UI sketches to Flutter projects.");
            println!();
            println!("Run 'sketchport --help' for usage information.");
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[derive(Serialize)]
struct JsonReport<'a> {
    error_count: usize,
    warning_count: usize,
    issues: &'a [validation::ValidationIssue],
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), SketchportError> {
    let project = ir::io_json::read_project_json(&args.input)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_project(&project, &opts);

    match args.output {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonReport {
                error_count: report.error_count(),
                warning_count: report.warning_count(),
                issues: &report.issues,
            })
            .map_err(|source| SketchportError::ProjectJsonWrite {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
            println!("{json}");
        }
        ReportFormat::Text => print!("{}", report),
    }

    if !report.is_ok() {
        Err(SketchportError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the interpret subcommand.
fn run_interpret(args: InterpretArgs, config: &Config) -> Result<(), SketchportError> {
    let mut project = match &args.project {
        Some(path) => ir::io_json::read_project_json(path)?,
        None => Project::new(args.device),
    };
    if project.screen_by_name(&args.screen_name).is_some() {
        return Err(SketchportError::invalid_input(format!(
            "project already has a screen named '{}'",
            args.screen_name
        )));
    }

    let opts = InterpretOptions {
        font_policy: config.font_policy(),
        targets: args.targets,
    };
    let detector = PayloadFileDetector::new(&args.payload);

    let screen = match (&args.image, args.width, args.height) {
        (Some(image), _, _) => {
            let bytes = fs::read(image).map_err(|e| SketchportError::SketchImage {
                message: format!("{}: {e}", image.display()),
            })?;
            interpret::interpret_sketch(&detector, &bytes, &args.screen_name, &opts)?
        }
        (None, Some(width), Some(height)) => {
            let payload = interpret::detect_payload(&detector, &[])?;
            let id = format!("screen-{}", codegen::naming::route_id(&args.screen_name));
            interpret::interpret_screen(id, &args.screen_name, width, height, &payload, &opts)?
        }
        _ => {
            return Err(SketchportError::invalid_input(
                "either --image or both --width and --height are required",
            ))
        }
    };

    eprintln!(
        "Interpreted screen '{}' with {} element(s)",
        screen.name,
        screen.elements.len()
    );
    project.screens.push(screen);

    match &args.output {
        Some(path) => ir::io_json::write_project_json(path, &project),
        None => {
            let json = ir::io_json::to_json_string(&project).map_err(|source| {
                SketchportError::ProjectJsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Execute the generate subcommand.
fn run_generate(args: GenerateArgs) -> Result<(), SketchportError> {
    let project = ir::io_json::read_project_json(&args.input)?;
    let tree = codegen::generate_project(&project)?;
    let written = package::write_source_tree(&tree, &args.output)?;

    println!(
        "Generated {} file(s) for {} screen(s) in {}",
        written,
        tree.units.len(),
        args.output.display()
    );
    Ok(())
}

/// Execute the export subcommand.
fn run_export(args: ExportArgs, config: &Config) -> Result<(), SketchportError> {
    let project = ir::io_json::read_project_json(&args.input)?;
    let opts = config.export_options(args.skeleton, args.work_dir, args.name)?;

    let output = args.output.unwrap_or_else(|| {
        let name = opts.archive_name.clone().unwrap_or_else(|| {
            package::archive_file_name(project.name.as_deref().unwrap_or_default())
        });
        PathBuf::from(name)
    });

    let file = File::create(&output).map_err(|e| package::packaging(&output, e))?;
    let mut sink = BufWriter::new(file);
    let result = package::export_project(&project, &opts, &mut sink).and_then(|summary| {
        sink.flush().map_err(|e| package::packaging(&output, e))?;
        Ok(summary)
    });

    match result {
        Ok(summary) => {
            println!(
                "Exported {} entries ({} bytes) to {}",
                summary.entries,
                summary.bytes,
                output.display()
            );
            Ok(())
        }
        Err(err) => {
            drop(sink);
            remove_partial(&output);
            Err(err)
        }
    }
}

fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), "failed to remove partial archive: {e}");
    }
}
