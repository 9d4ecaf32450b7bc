use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use rerun::RecordingStreamBuilder;

use indicatif::ProgressStyle;
use tracing::info_span;
use tracing_indicatif::span_ext::IndicatifSpanExt;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use montrack_rust::camera::CameraKind;
use montrack_rust::config::*;
use montrack_rust::dataset::*;
use montrack_rust::detector::ScriptedDetector;
use montrack_rust::image::Image;
use montrack_rust::pipeline::Pipeline;
use montrack_rust::track::StaticTracker;
use montrack_rust::visualization::render_annotations;

#[derive(Parser)]
pub struct Args {
    /// Scenario JSONL file; a seeded synthetic scenario runs when omitted
    #[clap(short, long)]
    pub input: Option<PathBuf>,
    /// Camera calibration JSON; deployment defaults when omitted
    #[clap(long)]
    pub calibration: Option<PathBuf>,
    #[clap(flatten)]
    pub config: Config,
}

fn main() -> Result<()> {
    // parse the config
    let args = Args::parse();
    let _ = CONFIG.set(args.config);
    let config = CONFIG.get().unwrap();

    // setup logging
    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stdout_writer()))
        .with(indicatif_layer)
        .init();

    // camera calibration is loaded once and then immutable
    let camera_config = match &args.calibration {
        Some(path) => CameraConfig::load(path)?,
        None => CameraConfig::default(),
    };
    let kind: CameraKind = config.camera_model.parse()?;
    let camera = camera_config.build_camera(kind)?;
    let shape = camera.image_shape;

    // load the scenario
    let mut source = match &args.input {
        Some(path) => ScenarioSource::Recorded(Dataset::new(Path::new(path), shape)?),
        None => ScenarioSource::Synthetic(SyntheticScenario::new(
            config.seed,
            shape,
            config.synthetic_frames,
        )),
    };

    let header_span = info_span!("header");
    header_span.pb_set_style(&ProgressStyle::default_bar());
    header_span.pb_set_length(source.length());
    let header_span_enter = header_span.enter();

    // visualization
    std::fs::create_dir_all("./logs")?;
    let recorder = RecordingStreamBuilder::new("montrack").save("./logs/montrack.rrd")?;

    // the scenario stands in for the external detector; its detections are
    // replayed through the pipeline in frame order
    let mut scripted = vec![];
    while let Some(frame) = source.next()? {
        scripted.push(frame.detections);
    }
    let frame_count = scripted.len();
    let detector = ScriptedDetector::new(scripted, config.min_confidence);
    let mut pipeline = Pipeline::new(Box::new(detector), Box::new(StaticTracker), camera);

    let frame = Image::filled(shape, 16);
    for _ in 0..frame_count {
        let humans = pipeline.process_frame(&frame)?;
        tracing::Span::current().pb_inc(1);

        let annotated = render_annotations(&frame, &humans);
        recorder.log("world/camera/tracks", &rerun::Image::try_from(annotated)?)?;

        let points: Vec<(f32, f32, f32)> = humans
            .iter()
            .filter_map(|h| h.location)
            .map(|l| (l.x as f32, l.y as f32, l.z as f32))
            .collect();
        recorder.log("world/humans", &rerun::Points3D::new(points))?;
    }

    std::mem::drop(header_span_enter);
    std::mem::drop(header_span);

    Ok(())
}
