// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Keepsake: photo digitization and enhancement
//
// Entry point. Initialises logging, loads the scan config, runs one capture
// through the pipeline and writes the result.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use keepsake_core::config::{FaceDetectorKind, OutputFormat};
use keepsake_core::error::{KeepsakeError, Result};
use keepsake_core::human_errors::humanize_error;
use keepsake_core::{ProcessingOptions, ScanConfig};
use keepsake_scan::{CenterFaceDetector, DarkestRegionDetector, FaceDetector, ScanPipeline, codec};

/// Face detector choices exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DetectorArg {
    /// Square at the centre of the photo
    Center,
    /// Darkest spot near the centre, if dark enough
    Darkest,
}

impl From<DetectorArg> for FaceDetectorKind {
    fn from(arg: DetectorArg) -> Self {
        match arg {
            DetectorArg::Center => FaceDetectorKind::Center,
            DetectorArg::Darkest => FaceDetectorKind::DarkestRegion,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "keepsake")]
#[command(about = "Clean up a camera capture of a printed photograph")]
#[command(version)]
struct Cli {
    /// Captured photo (JPEG, PNG, ...)
    input: PathBuf,

    /// Where to write the processed photo
    #[arg(short, long)]
    output: PathBuf,

    /// Scan settings (JSON); defaults are used when the file does not exist
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep the full frame instead of cropping to the photo's edges
    #[arg(long)]
    no_crop: bool,

    /// Skip the 16:9 crop around the face
    #[arg(long)]
    no_face_crop: bool,

    /// Skip glare suppression
    #[arg(long)]
    no_glare: bool,

    /// Skip contrast/brightness enhancement
    #[arg(long)]
    no_enhance: bool,

    /// Face detector for the face-aware crop
    #[arg(long, value_enum)]
    detector: Option<DetectorArg>,

    /// Also write what the pipeline found and did, as JSON
    #[arg(long)]
    metadata: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags win over the config file.
    fn apply_overrides(&self, mut config: ScanConfig) -> ScanConfig {
        let ProcessingOptions {
            auto_crop,
            face_aware_crop,
            remove_glare,
            enhance,
        } = &mut config.options;
        *auto_crop &= !self.no_crop;
        *face_aware_crop &= !self.no_face_crop;
        *remove_glare &= !self.no_glare;
        *enhance &= !self.no_enhance;
        if let Some(detector) = self.detector {
            config.face_detector = detector.into();
        }
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback_filter()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Scan failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

/// Log filter used when `RUST_LOG` is unset or invalid.
fn fallback_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::new("info")
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ScanConfig::load_or_default(path)?,
        None => ScanConfig::default(),
    };
    let config = cli.apply_overrides(config);
    let format = output_format(&cli.output, &config)?;
    tracing::info!(?config, ?format, "Keepsake starting");

    let original = codec::open(&cli.input)?;
    let pipeline = ScanPipeline::with_detector(detector_for(config.face_detector));
    let result = pipeline.process(&original, config.options);

    codec::save(result.frame(), &cli.output, format, config.jpeg_quality)?;
    if let Some(path) = &cli.metadata {
        let json = serde_json::to_string_pretty(result.metadata())?;
        std::fs::write(path, json)?;
    }

    let meta = result.metadata();
    println!(
        "{} -> {} ({}x{}, stages: {:?})",
        cli.input.display(),
        cli.output.display(),
        meta.width,
        meta.height,
        meta.stages
    );
    Ok(())
}

fn detector_for(kind: FaceDetectorKind) -> Box<dyn FaceDetector> {
    match kind {
        FaceDetectorKind::Center => Box::new(CenterFaceDetector),
        FaceDetectorKind::DarkestRegion => Box::new(DarkestRegionDetector),
    }
}

/// A recognised output extension picks the format; anything else falls back
/// to the configured one only when the file has no extension at all.
fn output_format(path: &Path, config: &ScanConfig) -> Result<OutputFormat> {
    match (OutputFormat::from_extension(path), path.extension()) {
        (Some(format), _) => Ok(format),
        (None, None) => Ok(config.output_format),
        (None, Some(ext)) => Err(KeepsakeError::Config(format!(
            "unsupported output extension {:?}; use .png, .jpg or .jpeg",
            ext
        ))),
    }
}
