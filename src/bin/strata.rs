use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "strata", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply one filter to an image and write a PNG.
    Apply(ApplyArgs),
    /// Run a JSON recipe and write the flattened document as a PNG.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Filter to apply.
    #[arg(long, value_enum)]
    filter: FilterChoice,

    /// Kernel size for box and Gaussian blur.
    #[arg(long, default_value_t = 3)]
    radius: u32,

    /// Gaussian standard deviation in pixels.
    #[arg(long, default_value_t = 1.0)]
    sigma: f32,

    /// Brightness gain of the tap-count normalization.
    #[arg(long, default_value_t = strata::DEFAULT_GAIN)]
    gain: f32,

    /// Centre kernels on the pixel instead of the legacy ceil(w/2) anchor.
    #[arg(long)]
    center_anchor: bool,

    /// Convolve rows in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (default: all cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Recipe JSON; relative image paths resolve against its directory.
    #[arg(long)]
    recipe: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    BoxBlur,
    GaussianBlur,
    SoftBlur,
    Edge,
    Grayscale,
    Invert,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn filter_spec(args: &ApplyArgs) -> strata::FilterSpec {
    match args.filter {
        FilterChoice::BoxBlur => strata::FilterSpec::BoxBlur {
            radius: args.radius,
        },
        FilterChoice::GaussianBlur => strata::FilterSpec::GaussianBlur {
            radius: args.radius,
            sigma: args.sigma,
        },
        FilterChoice::SoftBlur => strata::FilterSpec::SoftBlur,
        FilterChoice::Edge => strata::FilterSpec::Edge,
        FilterChoice::Grayscale => strata::FilterSpec::Grayscale {
            alpha: strata::AlphaMode::Preserve,
        },
        FilterChoice::Invert => strata::FilterSpec::Invert {
            alpha: strata::AlphaMode::Preserve,
        },
    }
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let src = strata::load_image(&args.in_path)?;
    let canvas = strata::Canvas::new(src.width(), src.height())?;

    let settings = strata::ConvolutionSettings {
        gain: args.gain,
        anchor: if args.center_anchor {
            strata::KernelAnchor::Center
        } else {
            strata::KernelAnchor::Legacy
        },
        parallel: args.parallel,
        threads: args.threads,
    };
    let filter = filter_spec(&args)
        .build(&settings)
        .context("build filter")?;

    let mut stack = strata::LayerStack::new(canvas);
    let layer = stack.add_layer("input", Some(src))?;
    strata::perform(&mut stack, layer, false, filter.as_ref())
        .with_context(|| format!("apply {}", filter.name()))?;

    write_png(&stack.flatten()?, &args.out)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let recipe = strata::Recipe::load(&args.recipe)?;
    let base = args.recipe.parent().unwrap_or_else(|| Path::new("."));
    let flat = recipe
        .render(base)
        .with_context(|| format!("run recipe '{}'", args.recipe.display()))?;
    write_png(&flat, &args.out)
}

fn write_png(buf: &strata::PixelBuffer, out: &Path) -> anyhow::Result<()> {
    strata::save_png(buf, out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
