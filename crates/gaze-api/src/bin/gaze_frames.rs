//! Gaze estimation over still images.
//!
//! Usage:
//!   gaze-frames <images...>                     # One summary per image
//!   gaze-frames <images...> --json              # One JSON object per line
//!   gaze-frames <images...> --model mesh.onnx   # Use an ONNX face mesh
//!   gaze-frames <images...> -o annotated/       # Also write annotated JPEGs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use gaze::{Eye, FrameAnalysis, GazeEstimator};
use gaze_api::{annotate, init_logging, BoxedDetector, OverlayOptions, Settings};
use serde::Serialize;
use tracing::{error, info};
use video_frame::{encode_jpeg, VideoFrame};

#[derive(Parser, Debug)]
#[command(name = "gaze-frames")]
#[command(author, version, about = "Gaze direction and blink state of still images", long_about = None)]
struct Args {
    /// Input image files
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Output as JSON lines
    #[arg(short, long)]
    json: bool,

    /// Face mesh ONNX model (overrides the config file)
    #[arg(long)]
    model: Option<String>,

    /// Recorded landmark set to replay instead of running a model
    #[arg(long, conflicts_with = "model")]
    landmarks: Option<String>,

    /// Settings file (default: ./gaze.toml when present)
    #[arg(short, long)]
    config: Option<String>,

    /// Directory for annotated frames
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Mirror each image before analysis (selfie camera frames)
    #[arg(long)]
    mirror: bool,
}

/// One line of JSON output
#[derive(Serialize)]
struct Output<'a> {
    image: &'a Path,
    label: &'static str,
    #[serde(flatten)]
    analysis: &'a FrameAnalysis,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(model) = &args.model {
        settings.detector.model_path = Some(model.clone());
    }
    if let Some(landmarks) = &args.landmarks {
        settings.detector.model_path = None;
        settings.replay_landmarks = Some(landmarks.clone());
    }

    let detector = settings.build_detector()?;
    let mut estimator = GazeEstimator::new(settings.gaze.clone(), detector)?;
    info!(
        "Analyzing {} image(s) with the {} detector",
        args.images.len(),
        estimator.detector().name()
    );

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut failures = 0;
    for (sequence, path) in args.images.iter().enumerate() {
        if let Err(e) = process(&args, &mut estimator, path, sequence as u32) {
            error!("{}: {:#}", path.display(), e);
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{} of {} image(s) failed", failures, args.images.len());
    }
    Ok(())
}

fn process(
    args: &Args,
    estimator: &mut GazeEstimator<BoxedDetector>,
    path: &Path,
    sequence: u32,
) -> anyhow::Result<()> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mut frame = VideoFrame::decode(&bytes)?;
    frame.sequence = sequence;
    if args.mirror {
        frame = frame.mirrored();
    }

    let face = estimator.detect(&frame)?;
    let analysis = estimator.analyze_landmarks(face.as_ref(), frame.size());

    if args.json {
        let output = Output {
            image: path,
            label: analysis.state.label(),
            analysis: &analysis,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}: {}", path.display(), analysis.state.label());
        println!("  {}", analysis.pupil_text(Eye::Left));
        println!("  {}", analysis.pupil_text(Eye::Right));
    }

    if let Some(dir) = &args.output_dir {
        let options = OverlayOptions {
            mirror: false,
            ..OverlayOptions::default()
        };
        let image = annotate(&frame, face.as_ref(), &analysis, &options)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("frame_{sequence}"));
        let target = dir.join(format!("{stem}_gaze.jpg"));
        fs::write(&target, encode_jpeg(&image)?)
            .with_context(|| format!("writing {}", target.display()))?;
    }

    Ok(())
}
