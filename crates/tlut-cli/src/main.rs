//! tlut - apply and inspect tiled 3D LUT atlases
//!
//! Grades images through a 2D atlas LUT, writes identity atlases for
//! external grading tools, and emits the matching GPU shader code.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tlut")]
#[command(author, version, about = "Tiled 3D LUT tool")]
#[command(long_about = "
Applies 3D color LUTs stored as tiled 2D atlases.

A size^3 LUT is stored as `size` slices along blue, each slice a
size x size tile, tiles packed into a grid x grid square image.

Examples:
  tlut identity -o neutral.png --size 64 --grid 8
  tlut apply shot.png -o graded.png -l look.png --size 64 --grid 8
  tlut apply shot.png -o graded.png -l look.png --layout look.yaml
  tlut info look.png --size 64 --grid 8
  tlut shader --size 33 --grid 6 --lang wgsl --interp trilinear
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade an image through an atlas LUT
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Write the neutral atlas for a layout
    Identity(IdentityArgs),

    /// Check an atlas against a layout
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Print the evaluator as GLSL or WGSL
    Shader(ShaderArgs),
}

/// Atlas geometry, from flags or a YAML layout file.
#[derive(Args)]
struct LayoutArgs {
    /// Samples per cube axis
    #[arg(long, required_unless_present = "layout")]
    size: Option<u32>,

    /// Tiles per atlas row and column
    #[arg(long, required_unless_present = "layout")]
    grid: Option<u32>,

    /// Layout YAML file (size, grid, interp, clampInput)
    #[arg(long, conflicts_with_all = ["size", "grid"])]
    layout: Option<PathBuf>,

    /// Interpolation: z-only or trilinear
    #[arg(long)]
    interp: Option<String>,

    /// Do not clamp input RGB to [0, 1]
    #[arg(long)]
    no_clamp: bool,
}

#[derive(Args)]
struct ApplyArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// LUT atlas image (.png, .jpg)
    #[arg(short, long)]
    lut: PathBuf,

    #[command(flatten)]
    layout: LayoutArgs,

    /// Atlas rows are stored bottom-up
    #[arg(long)]
    flip: bool,

    /// Output bit depth for PNG (8 or 16)
    #[arg(short, long)]
    depth: Option<u8>,
}

#[derive(Args)]
struct IdentityArgs {
    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Samples per cube axis
    #[arg(long, default_value = "64")]
    size: u32,

    /// Tiles per atlas row and column
    #[arg(long, default_value = "8")]
    grid: u32,

    /// Bit depth for PNG (8 or 16)
    #[arg(short, long, default_value = "16")]
    depth: u8,

    /// Also write the layout as YAML
    #[arg(long)]
    write_layout: Option<PathBuf>,
}

#[derive(Args)]
struct InfoArgs {
    /// LUT atlas image
    input: PathBuf,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Args)]
struct ShaderArgs {
    #[command(flatten)]
    layout: LayoutArgs,

    /// Target language: glsl, glsl-es or wgsl
    #[arg(long, default_value = "glsl")]
    lang: String,

    /// Emit a full-screen fragment entry point
    #[arg(long)]
    main: bool,

    /// Report linear filtering in the texture requirements
    #[arg(long)]
    linear: bool,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
        Commands::Identity(args) => commands::identity::run(args, cli.verbose),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Shader(args) => commands::shader::run(args, cli.verbose),
    }
}
