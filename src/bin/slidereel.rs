use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use slidereel::{
    Compositor, ExportContext, ExportDriver, ExportOpts, FfmpegSink, FfmpegSinkOpts, FileAudioSource,
    FrameRGBA, FsImageSource, ImageSource, Phase, PreparedImage, ProgressEvent, SlideshowProject,
};

#[derive(Parser, Debug)]
#[command(name = "slidereel", version)]
struct Cli {
    /// Log debug details to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the slideshow to an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render the frame shown at one instant as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Ignore the project's soundtrack.
    #[arg(long)]
    no_audio: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Show time in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_project(path: &Path) -> anyhow::Result<(SlideshowProject, PathBuf)> {
    let project = SlideshowProject::load(path)?;
    project
        .validate()
        .with_context(|| format!("validate project '{}'", path.display()))?;
    let root = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((project, root))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (project, root) = read_project(&args.in_path)?;
    let images = FsImageSource::new(&root);

    let mut ctx = ExportContext::new(
        &project.slides,
        project.settings,
        project.canvas,
        project.fps,
        &images,
    )
    .with_start_slide(project.start_slide);
    if let Some(audio) = project.audio.as_ref().filter(|_| !args.no_audio) {
        let path = slidereel::slideshow::project::resolve_asset_path(&root, &audio.source)?;
        ctx = ctx.with_audio(Arc::new(FileAudioSource { path }), audio.mode);
    }

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&args.out));
    let mut driver = ExportDriver::new(ExportOpts::default());
    let mut stderr = std::io::stderr();
    let mut report = |event: &ProgressEvent| match event {
        ProgressEvent::Frame(f) => {
            let _ = write!(stderr, "\rrendering {}", f.status);
            let _ = stderr.flush();
        }
        ProgressEvent::Warning(msg) => {
            let _ = writeln!(stderr, "\nwarning: {msg}");
        }
        ProgressEvent::Done { .. } | ProgressEvent::Failed(_) => {
            let _ = writeln!(stderr);
        }
        ProgressEvent::Phase(_) => {}
    };

    let outcome = driver.run(ctx, &mut sink, &mut report)?;
    eprintln!(
        "wrote {} ({} frames, {:.2}s{})",
        args.out.display(),
        outcome.frames,
        outcome.duration_secs,
        if outcome.artifact.has_audio {
            ", with audio"
        } else {
            ""
        }
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (project, root) = read_project(&args.in_path)?;
    let timeline = project.timeline()?;
    let phase = timeline.locate(args.time);
    let wanted: Vec<usize> = match phase {
        Phase::Steady { slide, .. } => vec![slide],
        Phase::Transitioning { from, to, .. } => vec![from, to],
        Phase::End => anyhow::bail!(
            "time {}s is past the end of the show ({}s)",
            args.time,
            timeline.total_duration_secs
        ),
    };

    let source = FsImageSource::new(&root);
    let mut images = vec![PreparedImage::placeholder(); project.slides.len()];
    for i in wanted {
        let slide = &project.slides[i];
        images[i] = source.load(slide).unwrap_or_else(|e| {
            tracing::warn!(slide = %slide.id, error = %e, "using blank placeholder");
            PreparedImage::placeholder()
        });
    }

    let mut compositor = Compositor::new(project.canvas)?;
    let mut frame = FrameRGBA::new(project.canvas)?;
    compositor.render_phase(&mut frame, phase, &project.slides, &images)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        frame.data(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
