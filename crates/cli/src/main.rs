use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use ncs_watch_core::accelerator::domain::accelerator_bridge::BridgeOpenError;
#[cfg(not(feature = "mvnc"))]
use ncs_watch_core::accelerator::domain::accelerator_bridge::AcceleratorBridge;
#[cfg(feature = "mvnc")]
use ncs_watch_core::accelerator::infrastructure::mvnc_bridge::MvncBridge;
use ncs_watch_core::pipeline::infrastructure::threaded_session;
use ncs_watch_core::shared::label_map::LabelMap;
use ncs_watch_core::shared::session_config::SessionConfig;

/// Streams raw square RGB frames through a neural compute accelerator and
/// prints one detected label per line.
#[derive(Parser)]
#[command(name = "ncs-watch")]
struct Cli {
    /// Raw frame stream (reads stdin when omitted or "-").
    input: Option<PathBuf>,

    /// Compiled graph file to load onto the device.
    #[arg(long)]
    graph: PathBuf,

    /// JSON label file: {"0": "face"} or ["background", "face"].
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Additional label as INDEX=LABEL (repeatable).
    #[arg(long = "label", value_name = "INDEX=LABEL")]
    label: Vec<String>,

    /// Detection confidence threshold (0.0-1.0); scores must exceed it.
    #[arg(long, default_value = "0.5")]
    threshold: f32,

    /// Minimum milliseconds between submissions (0 = no throttling).
    #[arg(long, default_value = "0")]
    throttle_ms: u64,

    /// Write every read frame to this JPEG for inspection.
    #[arg(long)]
    debug_image: Option<PathBuf>,

    /// Detections buffered before the loop blocks (0 = hand-off).
    #[arg(long, default_value = "0")]
    channel_capacity: usize,

    /// Accelerator device index.
    #[arg(long, default_value = "0")]
    device: i32,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    let reader = open_input(cli.input.as_ref())?;

    log::info!(
        "Starting session: graph {}, {} labels",
        config.graph_path.display(),
        config.labels.len()
    );
    let (detections, handle) = threaded_session::spawn(config, reader, open_bridge(cli.device));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for label in detections {
        writeln!(out, "{label}")?;
        out.flush()?;
    }

    let summary = handle.join()?;
    log::info!("Session ended: {:?}", summary.end);
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.graph.exists() {
        return Err(format!("Graph file not found: {}", cli.graph.display()).into());
    }
    if !(0.0..=1.0).contains(&cli.threshold) {
        return Err(format!(
            "Threshold must be between 0.0 and 1.0, got {}",
            cli.threshold
        )
        .into());
    }
    if cli.labels.is_none() && cli.label.is_empty() {
        return Err("At least one label is required (--labels or --label)".into());
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let mut labels = match &cli.labels {
        Some(path) => LabelMap::from_json_file(path)?,
        None => LabelMap::new(),
    };
    for spec in &cli.label {
        labels.insert_spec(spec)?;
    }

    let mut config = SessionConfig::new(&cli.graph, labels)
        .with_threshold(cli.threshold)
        .with_min_interval(Duration::from_millis(cli.throttle_ms))
        .with_detection_capacity(cli.channel_capacity);
    if let Some(path) = &cli.debug_image {
        config = config.with_debug_snapshot(path);
    }
    config.validate()?;
    Ok(config)
}

fn open_input(input: Option<&PathBuf>) -> Result<Box<dyn Read + Send>, Box<dyn std::error::Error>> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .map_err(|e| format!("Failed to open input {}: {e}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin())),
    }
}

#[cfg(feature = "mvnc")]
fn open_bridge(
    device: i32,
) -> impl FnOnce(&SessionConfig) -> Result<MvncBridge, BridgeOpenError> + Send + 'static {
    move |config| MvncBridge::open(device, &config.graph_path)
}

#[cfg(not(feature = "mvnc"))]
fn open_bridge(
    device: i32,
) -> impl FnOnce(&SessionConfig) -> Result<Box<dyn AcceleratorBridge>, BridgeOpenError> + Send + 'static
{
    move |_| {
        Err(BridgeOpenError::Unsupported(format!(
            "device {device} requested but this build lacks the `mvnc` feature"
        )))
    }
}
