use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use modeviz::pipeline::{write_decay_png, write_spectrum_png};
use modeviz::render::decay::reference_decay_plot;
use modeviz::render::plot::PlotStyle;
use modeviz::render::spectrum::SpectrumPlotStyle;
use modeviz::snapshot::encode::write_set;
use modeviz::snapshot::synth::generate_velocity_field;
use modeviz::{Fps, InputSpec, OutputSpec, RunConfig, SnapshotSet, ValueKind};

#[derive(Parser, Debug)]
#[command(name = "modeviz", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a comparison described by a JSON run file.
    Compare(CompareArgs),
    /// Compare snapshot files with the default U/V layout, no run file needed.
    Flow(FlowArgs),
    /// Plot a DMD spectrum from eigenvalue and amplitude CSV tables.
    Spectrum(SpectrumArgs),
    /// Plot the reference singular-value decay curves.
    SingularValues(SingularValuesArgs),
    /// Write a synthetic velocity snapshot file.
    Synth(SynthArgs),
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Run configuration JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum KindArg {
    Real,
    Complex,
}

impl From<KindArg> for ValueKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Real => ValueKind::Real,
            KindArg::Complex => ValueKind::Complex,
        }
    }
}

#[derive(Parser, Debug)]
struct FlowArgs {
    /// Input as `label=path`, optionally suffixed `:real` or `:complex`; repeat for each column.
    #[arg(long = "in", required = true, value_parser = parse_input_arg)]
    inputs: Vec<InputArg>,

    /// Element type of inputs without a `:real`/`:complex` suffix.
    #[arg(long, value_enum, default_value_t = KindArg::Real)]
    kind: KindArg,

    /// Output path; `.png`, `.gif` or `.mp4`.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second for animated output.
    #[arg(long, default_value_t = 10)]
    fps: u32,

    /// Pixels per grid cell.
    #[arg(long, default_value_t = 8)]
    cell_px: u32,
}

#[derive(Parser, Debug)]
struct SpectrumArgs {
    /// Eigenvalue table (`real,imag` per line).
    #[arg(long)]
    eigenvalues: PathBuf,

    /// Amplitude table (`real,imag` per line).
    #[arg(long)]
    amplitudes: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SingularValuesArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Number of singular values per curve.
    #[arg(long, default_value_t = 20)]
    points: usize,
}

#[derive(Parser, Debug)]
struct SynthArgs {
    /// Output snapshot file.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 32)]
    nx: u32,

    #[arg(long, default_value_t = 32)]
    ny: u32,

    #[arg(long, default_value_t = 50)]
    snapshots: u32,

    /// Scale snapshots by a growing plus a decaying exponential.
    #[arg(long, default_value_t = false)]
    growth: bool,
}

/// One `--in` value of the `flow` command.
#[derive(Clone, Debug, PartialEq)]
struct InputArg {
    label: String,
    path: PathBuf,
    kind: Option<KindArg>,
}

fn parse_input_arg(s: &str) -> Result<InputArg, String> {
    let bad = || format!("expected label=path[:real|:complex], got '{s}'");
    let (label, rest) = s.split_once('=').ok_or_else(bad)?;
    // Only a recognized suffix is split off, so paths may still contain ':'.
    let (path, kind) = match rest.rsplit_once(':') {
        Some((path, "real")) => (path, Some(KindArg::Real)),
        Some((path, "complex")) => (path, Some(KindArg::Complex)),
        _ => (rest, None),
    };
    if label.is_empty() || path.is_empty() {
        return Err(bad());
    }
    Ok(InputArg {
        label: label.to_owned(),
        path: PathBuf::from(path),
        kind,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compare(args) => cmd_compare(args),
        Command::Flow(args) => cmd_flow(args),
        Command::Spectrum(args) => cmd_spectrum(args),
        Command::SingularValues(args) => cmd_singular_values(args),
        Command::Synth(args) => cmd_synth(args),
    }
}

fn cmd_compare(args: CompareArgs) -> anyhow::Result<()> {
    let cfg = RunConfig::from_path(&args.config)?;
    let stats = modeviz::run_comparison(&cfg)
        .with_context(|| format!("render comparison from '{}'", args.config.display()))?;
    eprintln!(
        "wrote {} ({} frames, {}x{})",
        cfg.output.path.display(),
        stats.frames_pushed,
        stats.width,
        stats.height
    );
    Ok(())
}

fn cmd_flow(args: FlowArgs) -> anyhow::Result<()> {
    let default_kind = args.kind;
    let cfg = RunConfig {
        inputs: args
            .inputs
            .into_iter()
            .map(|input| InputSpec {
                label: input.label,
                path: input.path,
                kind: ValueKind::from(input.kind.unwrap_or(default_kind)),
            })
            .collect(),
        layout: None,
        style: modeviz::RenderStyle {
            cell_px: args.cell_px,
            ..modeviz::RenderStyle::default()
        },
        output: OutputSpec {
            path: args.out,
            format: None,
            fps: Fps::new(args.fps, 1)?,
            overwrite: true,
        },
    };
    let stats = modeviz::run_comparison(&cfg)?;
    eprintln!(
        "wrote {} ({} frames)",
        cfg.output.path.display(),
        stats.frames_pushed
    );
    Ok(())
}

fn cmd_spectrum(args: SpectrumArgs) -> anyhow::Result<()> {
    write_spectrum_png(
        &args.eigenvalues,
        &args.amplitudes,
        &args.out,
        &SpectrumPlotStyle::default(),
    )?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_singular_values(args: SingularValuesArgs) -> anyhow::Result<()> {
    let plot = reference_decay_plot(args.points);
    write_decay_png(&plot, &args.out, &PlotStyle::default())?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_synth(args: SynthArgs) -> anyhow::Result<()> {
    let field = generate_velocity_field(args.nx, args.ny, args.snapshots, args.growth)?;
    write_set(&args.out, &SnapshotSet::Real(field))
        .with_context(|| format!("write snapshot file '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
