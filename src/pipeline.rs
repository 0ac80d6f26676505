use std::path::Path;

use crate::config::{OutputFormat, RunConfig};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::gif::{GifSink, GifSinkOpts};
use crate::encode::png::{PngSink, write_png};
use crate::foundation::error::ModevizResult;
use crate::render::comparison::{ComparisonRenderer, RenderStats};
use crate::render::decay::{DecayPlot, render_decay};
use crate::render::plot::PlotStyle;
use crate::render::spectrum::{SpectrumPlotStyle, render_spectrum};
use crate::snapshot::decode::decode_path;
use crate::snapshot::set::LabeledSet;
use crate::spectrum::load_spectrum;

/// Decode every input of `cfg`, in order. The first failure aborts the whole run.
pub fn decode_inputs(cfg: &RunConfig) -> ModevizResult<Vec<LabeledSet>> {
    cfg.inputs
        .iter()
        .map(|input| {
            let set = decode_path(&input.path, input.kind)?;
            Ok(LabeledSet::new(input.label.clone(), set))
        })
        .collect()
}

/// Decode, validate, render and encode one comparison run.
///
/// Every input is decoded and the color scales computed before any output file is touched.
#[tracing::instrument(skip_all, fields(out = %cfg.output.path.display()))]
pub fn run_comparison(cfg: &RunConfig) -> ModevizResult<RenderStats> {
    cfg.validate()?;
    let format = cfg.output.resolved_format()?;
    let sets = decode_inputs(cfg)?;
    let renderer = ComparisonRenderer::new(&sets, cfg.layout(), cfg.style.clone())?;

    let out = &cfg.output.path;
    let bg = cfg.style.bg_rgba;
    let stats = match format {
        OutputFormat::Png => {
            let mut sink = PngSink::new(out, bg);
            renderer.render_final_to_sink(&mut sink)?
        }
        OutputFormat::Gif => {
            let mut opts = GifSinkOpts::new(out);
            opts.bg_rgba = bg;
            let mut sink = GifSink::new(opts);
            renderer.render_to_sink(&mut sink, cfg.output.fps)?
        }
        OutputFormat::Mp4 => {
            let mut sink = FfmpegSink::new(FfmpegSinkOpts {
                out_path: out.clone(),
                overwrite: cfg.output.overwrite,
                bg_rgba: bg,
            });
            renderer.render_to_sink(&mut sink, cfg.output.fps)?
        }
    };

    tracing::info!(
        path = %out.display(),
        ?format,
        frames = stats.frames_pushed,
        width = stats.width,
        height = stats.height,
        "comparison written"
    );
    Ok(stats)
}

/// Load eigenvalue/amplitude CSV tables and write the 3D spectrum plot as a PNG.
#[tracing::instrument(skip(style))]
pub fn write_spectrum_png(
    eigenvalues: &Path,
    amplitudes: &Path,
    out: &Path,
    style: &SpectrumPlotStyle,
) -> ModevizResult<()> {
    let spectrum = load_spectrum(eigenvalues, amplitudes)?;
    let frame = render_spectrum(&spectrum, style)?;
    write_png(out, &frame, style.plot.bg_rgba)?;
    tracing::info!(path = %out.display(), modes = spectrum.len(), "spectrum plot written");
    Ok(())
}

/// Write a singular-value decay plot as a PNG.
#[tracing::instrument(skip(plot, style))]
pub fn write_decay_png(plot: &DecayPlot, out: &Path, style: &PlotStyle) -> ModevizResult<()> {
    let frame = render_decay(plot, style)?;
    write_png(out, &frame, style.bg_rgba)?;
    tracing::info!(path = %out.display(), series = plot.series.len(), "decay plot written");
    Ok(())
}
