//! # Topstart CLI
//!
//! Command-line interface for top-aligned thermal printing.
//!
//! ## Usage
//!
//! ```bash
//! # Print an image on the default device
//! topstart print label.png
//!
//! # Three copies, dithered, content moved up by 2mm
//! topstart print --copies 3 --mode dither --offset-mm -2 photo.jpg
//!
//! # Try the printer, fall back to a raw dump, then to a PNG
//! topstart print --device /dev/ttyUSB0 --output job.bin --png job.png label.png
//!
//! # Only look at what would be printed
//! topstart preview label.png --png preview.png
//!
//! # Print the alignment test page with a trial offset
//! topstart test-page --offset-mm 1.5
//!
//! # Recently printed files
//! topstart history
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use topstart::{
    Pipeline, PipelineConfig, TopstartError, config,
    history::{self, History},
    ir::CommandStream,
    raster,
    render::{dither::QuantizeMethod, trim::TrimMode},
    transport::{
        CopyReport, DeviceTransport, FallbackTransport, FileTransport, PngTransport, device,
        print_copies,
    },
};

/// Topstart - Print images flush with the top of thermal paper
#[derive(Parser, Debug)]
#[command(name = "topstart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command that runs the pipeline.
#[derive(Args, Debug)]
struct ProcessArgs {
    /// JSON config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Vertical offset in millimeters (negative moves content up)
    #[arg(long, value_name = "MM", allow_negative_numbers = true)]
    offset_mm: Option<f32>,

    /// Monochrome conversion: threshold or dither
    #[arg(long)]
    mode: Option<String>,

    /// Margin trimming: none, top or auto
    #[arg(long)]
    trim: Option<String>,
}

/// Where jobs go, in fallback order.
#[derive(Args, Debug)]
struct TargetArgs {
    /// Printer device path
    #[arg(long, default_value = device::DEFAULT_DEVICE)]
    device: PathBuf,

    /// Write raw ESC/POS bytes here if the device fails
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Save a PNG here if everything else fails
    #[arg(long, value_name = "FILE")]
    png: Option<PathBuf>,
}

impl TargetArgs {
    fn chain(self) -> FallbackTransport {
        let mut chain = FallbackTransport::new().with(DeviceTransport::new(self.device));
        if let Some(path) = self.output {
            chain = chain.with(FileTransport::new(path));
        }
        if let Some(path) = self.png {
            chain = chain.with(PngTransport::new(path));
        }
        chain
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print an image to the thermal printer
    Print {
        /// Image to print
        image: PathBuf,

        /// Number of copies
        #[arg(long, default_value = "1")]
        copies: u32,

        #[command(flatten)]
        target: TargetArgs,

        /// History file (defaults to the user state directory)
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Save the processed bilevel image as PNG without printing
    Preview {
        /// Image to process
        image: PathBuf,

        /// Output PNG
        #[arg(long, value_name = "FILE")]
        png: PathBuf,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Print a test page for checking alignment and offset
    TestPage {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Show recently printed files
    History {
        /// History file (defaults to the user state directory)
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,

        /// Forget all entries
        #[arg(long)]
        clear: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), TopstartError> {
    match cli.command {
        Commands::Print {
            image,
            copies,
            target,
            history,
            process,
        } => {
            let pipeline = build_pipeline(&process)?;
            let source = raster::load(&image)?;
            let job = pipeline.prepare_job(&source)?;

            let report = send(&mut target.chain(), &job, copies)?;
            println!(
                "Printed {} of {} copies of {}",
                report.succeeded,
                report.requested,
                image.display()
            );
            record_history(history.as_deref(), &image);
        }

        Commands::Preview {
            image,
            png,
            process,
        } => {
            let pipeline = build_pipeline(&process)?;
            let source = raster::load(&image)?;
            let bilevel = pipeline.process(&source)?;
            bilevel.save(&png)?;
            println!(
                "Saved {}x{} preview to {}",
                bilevel.width(),
                bilevel.height(),
                png.display()
            );
        }

        Commands::TestPage { target, process } => {
            let pipeline = build_pipeline(&process)?;
            let job = pipeline.prepare_test_page()?;
            send(&mut target.chain(), &job, 1)?;
            println!(
                "Printed test page with offset {}mm",
                pipeline.config().offset_mm
            );
        }

        Commands::History { history, clear } => {
            let path = history_path(history.as_deref()).ok_or_else(|| {
                TopstartError::History("no history location; pass --history".into())
            })?;
            let mut entries = History::load(&path)?;

            if clear {
                entries.clear();
                entries.save(&path)?;
                println!("History cleared");
                return Ok(());
            }

            if entries.is_empty() {
                println!("No recent files");
            }
            for (i, entry) in entries.entries().iter().enumerate() {
                println!("{:>2}. {}", i + 1, entry.display());
            }
        }
    }

    Ok(())
}

/// Send `copies` of `job`, reporting failed copies on stderr.
///
/// Fails only when no copy made it out.
fn send(
    chain: &mut FallbackTransport,
    job: &CommandStream,
    copies: u32,
) -> Result<CopyReport, TopstartError> {
    let report = print_copies(chain, job, copies);
    for (copy, error) in &report.failures {
        eprintln!("Copy {} failed: {}", copy, error);
    }
    if copies > 0 && report.succeeded == 0 {
        return Err(TopstartError::Transport(format!(
            "none of {} copies could be printed",
            copies
        )));
    }
    Ok(report)
}

/// Load the config file (if any) and apply command-line overrides.
fn build_pipeline(args: &ProcessArgs) -> Result<Pipeline, TopstartError> {
    let mut settings = match &args.config {
        Some(path) => config::load(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(offset) = args.offset_mm {
        settings.offset_mm = offset;
    }
    if let Some(mode) = &args.mode {
        settings.method = mode.parse::<QuantizeMethod>()?;
    }
    if let Some(trim) = &args.trim {
        settings.trim = trim.parse::<TrimMode>()?;
    }

    debug!(?settings, "Pipeline configuration");
    Pipeline::new(settings)
}

fn history_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(history::default_path)
}

/// Add `image` to the history file. Failures are logged, not fatal.
fn record_history(explicit: Option<&Path>, image: &Path) {
    let Some(path) = history_path(explicit) else {
        return;
    };
    let entry = image.canonicalize().unwrap_or_else(|_| image.to_path_buf());

    let result = History::load(&path).and_then(|mut entries| {
        entries.add(entry);
        entries.save(&path)
    });
    match result {
        Ok(()) => info!(path = %path.display(), "History updated"),
        Err(e) => warn!(error = %e, "Could not update history"),
    }
}
