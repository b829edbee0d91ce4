use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vanish", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split an image into sparse layers and write one PNG per layer.
    Partition(PartitionArgs),
    /// Render a single dissolve frame as a PNG.
    Frame(FrameArgs),
    /// Render the whole dissolve as an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Replay recorded detections and dissolve the image once the gate fires.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct PartitionArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of layers.
    #[arg(long, default_value_t = vanish::DEFAULT_PARTITION_COUNT)]
    count: usize,

    /// Output directory for `part_NNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// RNG seed; clock-seeded when absent.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Animation time, in time units from the start of the dissolve.
    #[arg(long)]
    t: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Config JSON; defaults apply when absent.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Config JSON; defaults apply when absent.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input image standing in for the live source.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// JSON array of detection batches, one per polling cycle.
    #[arg(long)]
    detections: PathBuf,

    /// Optional MP4 of the dissolve (requires `ffmpeg` on PATH).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Config JSON; defaults apply when absent.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Partition(args) => cmd_partition(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<vanish::VanishConfig> {
    match path {
        Some(path) => Ok(vanish::VanishConfig::from_json_path(path)?),
        None => Ok(vanish::VanishConfig::default()),
    }
}

/// Load the still and size the canvas to it.
fn open_still(
    path: &Path,
    config: &mut vanish::VanishConfig,
) -> anyhow::Result<vanish::StillSource> {
    let image = vanish::RasterImage::load(path)?;
    config.canvas = vanish::Canvas::new(image.width(), image.height())?;
    Ok(vanish::StillSource::new(image))
}

fn cmd_partition(args: PartitionArgs) -> anyhow::Result<()> {
    let image = vanish::RasterImage::load(&args.in_path)?;
    let mut rng = args
        .seed
        .map(vanish::Rng64::new)
        .unwrap_or_else(vanish::Rng64::from_clock);
    let parts = vanish::PixelPartitioner::new(args.count)?.partition(&image, &mut rng)?;
    let written = vanish::write_sub_images(&args.out_dir, &parts)?;

    eprintln!("wrote {} layers to {}", written.len(), args.out_dir.display());
    Ok(())
}

fn planned_session(
    in_path: &Path,
    config: Option<&Path>,
) -> anyhow::Result<vanish::DissolveSession> {
    let mut config = read_config(config)?;
    let mut source = open_still(in_path, &mut config)?;
    let mut session = vanish::DissolveSession::new(&config)?;
    session.plan(&mut source)?;
    Ok(session)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let session = planned_session(&args.in_path, args.config.as_deref())?;
    let frame = session.render_frame(args.t)?;
    frame.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let session = planned_session(&args.in_path, args.config.as_deref())?;
    encode_session(&session, &args.out, args.fps)
}

fn encode_session(session: &vanish::DissolveSession, out: &Path, fps: u32) -> anyhow::Result<()> {
    let timeline = session
        .timeline()
        .context("session has no dissolve timeline")?;
    let opts = vanish::Mp4Opts {
        fps,
        background: [18, 20, 28],
        overwrite: true,
    };
    let frames = vanish::render_dissolve_to_mp4(session.stage(), timeline, out, &opts)?;

    eprintln!("wrote {} ({frames} frames)", out.display());
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = read_config(args.config.as_deref())?;
    let mut source = open_still(&args.in_path, &mut config)?;
    let classifier = vanish::ScriptedClassifier::from_json_path(&args.detections)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build tokio runtime")?;
    let outcome = runtime.block_on(vanish::run_pipeline(&mut source, classifier, &config))?;

    match outcome {
        vanish::PipelineOutcome::Vanished(session) => {
            eprintln!("vanished ({} surfaces)", session.stage().len());
            if let Some(out) = &args.out {
                encode_session(&session, out, 30)?;
            }
        }
        vanish::PipelineOutcome::StreamEnded { cycles } => {
            eprintln!("no trigger after {cycles} detection cycles");
        }
    }
    Ok(())
}
