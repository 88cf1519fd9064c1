use clap::Parser;
use std::io::BufRead;
use std::time::Instant;
use stereo_hand_haptics::config::TrackerConfig;
use stereo_hand_haptics::curve::CurveSet;
use stereo_hand_haptics::data_loader::load_stereo_frames;
use stereo_hand_haptics::haptics::{HapticEvent, SimulatedSink};
use stereo_hand_haptics::io::{
    SessionReport, load_calibration, now_timestamp, object_from_json, write_session_report,
};
use stereo_hand_haptics::pipeline::FramePipeline;
use stereo_hand_haptics::visualization::{log_curves, log_hands, set_frame};

#[derive(Parser)]
#[command(version, about, author)]
struct HapticReplayCli {
    /// stereo calibration json
    #[arg(short, long)]
    calibration: String,

    /// folder of recorded detector frames (*.json)
    #[arg(short, long)]
    frames: String,

    /// initial curve set json
    #[arg(long)]
    curves: Option<String>,

    /// tracker config json
    #[arg(long)]
    config: Option<String>,

    /// text file with one graph command (json or plain text) per line
    #[arg(long)]
    commands: Option<String>,

    /// session report output path
    #[arg(long, default_value = "session_report.json")]
    report: String,

    /// save a rerun recording to this .rrd file
    #[arg(long)]
    rerun: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = HapticReplayCli::parse();

    let config: TrackerConfig = match &cli.config {
        Some(path) => object_from_json(path)?,
        None => TrackerConfig::default(),
    };
    let calibration = load_calibration(&cli.calibration)?;
    println!("{}", calibration.summary());

    let mut curves: CurveSet = match &cli.curves {
        Some(path) => object_from_json(path)?,
        None => CurveSet::new(),
    };
    if let Some(path) = &cli.commands {
        let file = std::io::BufReader::new(std::fs::File::open(path)?);
        for line in file.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            curves.apply_text(&line, &config);
        }
    }

    let now = Instant::now();
    let frames = load_stereo_frames(&cli.frames)?;
    println!(
        "loading {} frames took {:.6} sec",
        frames.len(),
        now.elapsed().as_secs_f64()
    );

    let recording = match &cli.rerun {
        Some(path) => Some(rerun::RecordingStreamBuilder::new("haptic_replay").save(path)?),
        None => None,
    };
    if let Some(recording) = &recording {
        set_frame(recording, 0);
        log_curves(recording, "/world", &curves);
    }

    let mut pipeline = FramePipeline::new(Some(calibration), config.clone());
    let mut sink = SimulatedSink::new();
    let mut report = SessionReport {
        timestamp: now_timestamp(),
        starts_per_channel: vec![0; config.channel_count],
        ..Default::default()
    };

    let now = Instant::now();
    for (frame_idx, frame) in frames.iter().enumerate() {
        let frame_report = pipeline.process(frame, &curves, &mut sink)?;
        report.frames += 1;
        if !frame_report.hands.is_empty() {
            report.frames_with_hands += 1;
        }
        if !frame_report.touched.is_empty() {
            report.frames_with_touch += 1;
        }
        for touched in &frame_report.touched {
            *report.touches_per_curve.entry(touched.name.clone()).or_default() += 1;
        }
        for event in &frame_report.events {
            if let HapticEvent::Started { channel, .. } = event {
                report.starts_per_channel[*channel] += 1;
            }
        }
        if let Some(recording) = &recording {
            set_frame(recording, frame_idx);
            log_hands(recording, "/world", &frame_report.hands);
        }
    }
    pipeline.shutdown(&mut sink);
    let duration_sec = now.elapsed().as_secs_f64();
    println!("replay took {:.6} sec", duration_sec);
    if !frames.is_empty() {
        println!("avg: {} sec", duration_sec / frames.len() as f64);
    }

    write_session_report(&cli.report, &report)?;
    println!("report written to {}", cli.report);
    Ok(())
}
