use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
    sync::mpsc,
};

use anyhow::Context as _;
use burnfx::{BurnEngine, BurnObserver, BurnPreset, ParticleStats, Region, Viewport};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "burnfx", version)]
struct Cli {
    /// Log engine events (phase entries, completion) to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in presets.
    Presets,
    /// Print a preset as pretty JSON.
    DumpPreset(DumpArgs),
    /// Simulate up to a point in time and write the heat buffer as a PNG.
    Frame(FrameArgs),
    /// Simulate a whole run and write a JSON summary.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct PresetArgs {
    /// Built-in preset name (default: enhanced).
    #[arg(long, conflicts_with = "preset_file")]
    preset: Option<String>,

    /// Preset JSON file.
    #[arg(long = "preset-file")]
    preset_file: Option<PathBuf>,

    /// Override the preset seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct SimArgs {
    #[command(flatten)]
    preset: PresetArgs,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 360)]
    height: u32,

    /// Normalized region as `x,y,w,h`.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    region: Option<Vec<f64>>,

    /// Host frame rate used to step the engine.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
}

#[derive(Args, Debug)]
struct DumpArgs {
    #[command(flatten)]
    preset: PresetArgs,

    /// Output path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    sim: SimArgs,

    /// Seconds of simulated time before the capture.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    sim: SimArgs,

    /// Keep ticking this many seconds after completion.
    #[arg(long, default_value_t = 0.0)]
    tail: f64,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Presets => cmd_presets(),
        Command::DumpPreset(args) => cmd_dump_preset(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_preset(args: &PresetArgs) -> anyhow::Result<BurnPreset> {
    let mut preset = match &args.preset_file {
        Some(path) => BurnPreset::from_path(path)
            .with_context(|| format!("load preset '{}'", path.display()))?,
        None => BurnPreset::builtin(args.preset.as_deref().unwrap_or("enhanced"))?,
    };
    if let Some(seed) = args.seed {
        preset.seed = seed;
    }
    Ok(preset)
}

fn build_engine(sim: &SimArgs) -> anyhow::Result<BurnEngine> {
    let preset = load_preset(&sim.preset)?;
    let region = match sim.region.as_deref() {
        Some([x, y, w, h]) => Region::new(*x, *y, *w, *h),
        Some(other) => anyhow::bail!("--region needs 4 values, got {}", other.len()),
        None => Region::FULL,
    };
    let viewport = Viewport::new(sim.width, sim.height)?;
    Ok(BurnEngine::new(preset, region, viewport)?)
}

const MAX_FPS: f64 = 1000.0;

fn frame_dt(fps: f64) -> anyhow::Result<f64> {
    if !fps.is_finite() || fps <= 0.0 {
        anyhow::bail!("--fps must be a positive number, got {fps}");
    }
    if fps > MAX_FPS {
        anyhow::bail!("--fps must be at most {MAX_FPS}, got {fps}");
    }
    Ok(1.0 / fps)
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_text(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            create_parent_dir(path)?;
            let mut w = BufWriter::new(
                File::create(path).with_context(|| format!("create '{}'", path.display()))?,
            );
            w.write_all(text.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    for name in BurnPreset::builtin_names() {
        let p = BurnPreset::builtin(name)?;
        let phases: Vec<&str> = p.phases.iter().map(|ph| ph.name.as_str()).collect();
        println!(
            "{name}\t{:.2}s\t{:?}\t{}",
            p.total_duration(),
            p.front.direction,
            phases.join(" > ")
        );
    }
    Ok(())
}

fn cmd_dump_preset(args: DumpArgs) -> anyhow::Result<()> {
    let preset = load_preset(&args.preset)?;
    write_text(args.out.as_deref(), &preset.to_json_pretty()?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let dt = frame_dt(args.sim.fps)?;
    let mut engine = build_engine(&args.sim)?;
    let target = args.time.max(0.0);
    while engine.elapsed() + dt * 0.5 < target && !engine.is_complete() {
        engine.tick(dt);
    }

    let snap = engine.snapshot();
    create_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        snap.heat.rgba(),
        snap.heat.width(),
        snap.heat.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, phase {}, t={:.3}s)",
        args.out.display(),
        snap.heat.width(),
        snap.heat.height(),
        snap.phase,
        snap.elapsed
    );
    Ok(())
}

enum Event {
    Enter(usize, String),
    Complete,
}

struct ChannelObserver(mpsc::Sender<Event>);

impl BurnObserver for ChannelObserver {
    fn on_phase_enter(&mut self, index: usize, name: &str) {
        let _ = self.0.send(Event::Enter(index, name.to_owned()));
    }

    fn on_complete(&mut self) {
        let _ = self.0.send(Event::Complete);
    }
}

#[derive(serde::Serialize)]
struct PhaseEntry {
    index: usize,
    name: String,
    entered_at: f64,
}

#[derive(serde::Serialize)]
struct RunSummary {
    preset: String,
    seed: u64,
    total_secs: f64,
    ticks: u64,
    phases: Vec<PhaseEntry>,
    completed_at: Option<f64>,
    peak_particles: usize,
    particles: ParticleStats,
    final_mean_heat: f64,
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let dt = frame_dt(args.sim.fps)?;
    let mut engine = build_engine(&args.sim)?;
    let (tx, rx) = mpsc::channel();
    engine.set_observer(ChannelObserver(tx));

    let mut phases = Vec::new();
    let mut completed_at = None;
    let mut peak_particles = 0;
    let mut ticks = 0u64;
    let mut tail_left = args.tail.max(0.0);
    loop {
        let done = engine.is_complete();
        if done {
            if tail_left <= 0.0 {
                break;
            }
            tail_left -= dt;
        }
        let snap = engine.tick(dt);
        ticks += 1;
        peak_particles = peak_particles.max(snap.particles.len());
        let at = snap.elapsed;
        for ev in rx.try_iter() {
            match ev {
                Event::Enter(index, name) => phases.push(PhaseEntry {
                    index,
                    name,
                    entered_at: at,
                }),
                Event::Complete => completed_at = Some(at),
            }
        }
    }

    let summary = RunSummary {
        preset: engine.preset_name().to_owned(),
        seed: engine.preset().seed,
        total_secs: engine.total_duration(),
        ticks,
        phases,
        completed_at,
        peak_particles,
        particles: engine.particle_stats(),
        final_mean_heat: engine.snapshot().heat.mean_heat(),
    };
    let text = serde_json::to_string_pretty(&summary).context("serialize run summary")?;
    write_text(args.out.as_deref(), &text)
}
