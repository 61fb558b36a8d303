use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use workflow::config::{ApertureConfig, WorkflowConfig, DEFAULT_MTF_THRESHOLD};
use workflow::runner::{Runner, WorkflowResult};

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline PSF and MTF evaluation of a circular aperture")]
struct Args {
    /// Load a workflow config from YAML; the aperture and optics flags are ignored
    #[arg(long)]
    config: Option<PathBuf>,
    /// Aperture radius in grid samples
    #[arg(long, default_value_t = 12.0)]
    radius: f64,
    /// Central obstruction radius in grid samples
    #[arg(long, default_value_t = 0.0)]
    obstruction: f64,
    /// Zero samples added on every side of the disk
    #[arg(long, default_value_t = 20)]
    padding: usize,
    /// Physical length of one grid sample, in metres
    #[arg(long, default_value_t = 1e-3)]
    sample_spacing: f64,
    /// Wavelength in metres
    #[arg(long, default_value_t = 800e-9)]
    wavelength: f64,
    /// Focal length in metres
    #[arg(long, default_value_t = 91e-3)]
    focal_length: f64,
    /// Detector pixel pitch in metres
    #[arg(long)]
    pixel_pitch: Option<f64>,
    #[arg(long, default_value_t = DEFAULT_MTF_THRESHOLD)]
    mtf_threshold: f64,
    /// Write the JSON report here
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.config {
        WorkflowConfig::load(path)?
    } else {
        let aperture = ApertureConfig {
            radius: args.radius,
            obstruction_radius: args.obstruction,
            grid_size: None,
            padding: args.padding,
            sample_spacing: args.sample_spacing,
        };
        WorkflowConfig::from_args(aperture, args.wavelength, args.focal_length)
            .with_pixel_pitch(args.pixel_pitch)
            .with_mtf_threshold(args.mtf_threshold)
    };

    let result = Runner::new(workflow_config).execute()?;
    let summary = &result.summary;
    println!(
        "PSF {}x{} -> first minimum {}, theory {:.4e} m; MTF cutoff {}, theory {:.4e} cycles/m",
        summary.grid_shape.0,
        summary.grid_shape.1,
        format_optional(summary.refined_first_minimum, "m"),
        summary.theoretical_first_minimum,
        format_optional(summary.mtf_cutoff, "cycles/m"),
        summary.theoretical_cutoff
    );
    if let (Some(measured), Some(theory)) = (
        summary.mtf_cutoff_cycles_per_pixel,
        summary.theoretical_cutoff_cycles_per_pixel,
    ) {
        println!(
            "MTF cutoff {:.3} cycles/pixel, theory {:.3} cycles/pixel",
            measured, theory
        );
    }

    if let Some(path) = args.output {
        write_report(&path, &result)?;
        log::info!("report written to {}", path.display());
    }

    Ok(())
}

fn format_optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{:.4e} {}", value, unit),
        None => "not found".to_string(),
    }
}

fn write_report(path: &Path, result: &WorkflowResult) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let report = serde_json::to_string_pretty(result).context("serialising report")?;
    fs::write(path, report).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}
