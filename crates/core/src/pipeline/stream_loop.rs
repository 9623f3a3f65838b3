use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crossbeam_channel::Sender;
use thiserror::Error;

use crate::accelerator::domain::accelerator_bridge::{AcceleratorBridge, BridgeOpenError};
use crate::accelerator::domain::device_error::DeviceError;
use crate::detection::domain::detection_decoder::DetectionDecoder;
use crate::encoding::tensor_encoder;
use crate::pipeline::congestion_controller::{CongestionController, GateDecision};
use crate::pipeline::session_stats::{SessionEnd, SessionStats, SessionSummary};
use crate::shared::constants::FLOAT_BYTES;
use crate::shared::frame::{square_side, FrameGeometryError};
use crate::shared::session_config::{ConfigError, SessionConfig};
use crate::video::domain::frame_source::{FrameSource, StreamError};
use crate::video::domain::snapshot_writer::SnapshotWriter;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("invalid session configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to open accelerator: {0}")]
    Open(#[from] BridgeOpenError),
    #[error("{fifo} fifo element size {bytes} is not a whole number of floats")]
    ElementSize { fifo: &'static str, bytes: usize },
    #[error("accelerator input of {frame_len} bytes per frame is not a square RGB image: {source}")]
    Geometry {
        frame_len: usize,
        #[source]
        source: FrameGeometryError,
    },
    #[error("frame source delivers {source_len} bytes per frame but the accelerator expects {expected}")]
    FrameLenMismatch { source_len: usize, expected: usize },
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("session worker panicked")]
    Panicked,
}

/// Frame bytes per cycle implied by the bridge's input element size.
///
/// The input FIFO carries one float per frame byte.
pub fn negotiated_frame_len<B: AcceleratorBridge>(bridge: &B) -> Result<usize, SessionError> {
    let bytes = bridge.input_element_size();
    if bytes == 0 || bytes % FLOAT_BYTES as usize != 0 {
        return Err(SessionError::ElementSize {
            fifo: "input",
            bytes,
        });
    }
    let frame_len = bytes / FLOAT_BYTES as usize;
    square_side(frame_len).map_err(|source| SessionError::Geometry { frame_len, source })?;
    Ok(frame_len)
}

enum Cycle {
    Continue,
    Finished(SessionEnd),
}

/// Single-threaded read → gate → encode → submit → receive → decode → emit loop.
///
/// Owns the bridge: when `run` returns, on any path, the bridge is dropped and
/// its device resources are released before the caller closes the detection
/// channel.
pub struct StreamLoop<B, S> {
    bridge: B,
    source: S,
    decoder: DetectionDecoder,
    gate: CongestionController,
    snapshot_path: Option<PathBuf>,
    snapshot_writer: Option<Box<dyn SnapshotWriter>>,
    tensor: Vec<f32>,
    stats: SessionStats,
}

impl<B: AcceleratorBridge, S: FrameSource> StreamLoop<B, S> {
    /// Completes session initialization against an already-open bridge.
    pub fn new(config: &SessionConfig, bridge: B, source: S) -> Result<Self, SessionError> {
        config.validate()?;

        let frame_len = negotiated_frame_len(&bridge)?;
        if source.frame_len() != frame_len {
            return Err(SessionError::FrameLenMismatch {
                source_len: source.frame_len(),
                expected: frame_len,
            });
        }

        let output_bytes = bridge.output_element_size();
        if output_bytes % FLOAT_BYTES as usize != 0 {
            return Err(SessionError::ElementSize {
                fifo: "output",
                bytes: output_bytes,
            });
        }
        let output_len = output_bytes / FLOAT_BYTES as usize;

        log::info!(
            "session ready: frame {frame_len} bytes, {output_len} scores, threshold {}, min interval {:?}",
            config.threshold,
            config.min_interval
        );

        let decoder = DetectionDecoder::new(config.labels.clone(), config.threshold);
        if decoder.exceeds_labels(output_len) {
            log::warn!(
                "output size {output_len} greater than label count {}",
                config.labels.len()
            );
        }

        let start = Instant::now();
        Ok(Self {
            bridge,
            source,
            decoder,
            gate: CongestionController::new(config.min_interval, start),
            snapshot_path: config.debug_snapshot.clone(),
            snapshot_writer: None,
            tensor: Vec::with_capacity(frame_len),
            stats: SessionStats::new(start),
        })
    }

    /// Writer used for the debug snapshot; inert unless the config names a path.
    pub fn with_snapshot_writer(mut self, writer: Box<dyn SnapshotWriter>) -> Self {
        self.snapshot_writer = Some(writer);
        self
    }

    /// Drives cycles until the stream ends, the token is cancelled, the
    /// consumer goes away, or a stream/device error occurs.
    pub fn run(
        mut self,
        detections: &Sender<String>,
        cancelled: &AtomicBool,
    ) -> Result<SessionSummary, SessionError> {
        loop {
            if cancelled.load(Ordering::Relaxed) {
                return Ok(self.stats.finish(SessionEnd::Cancelled));
            }
            if let Cycle::Finished(end) = self.cycle(detections)? {
                return Ok(self.stats.finish(end));
            }
        }
    }

    fn cycle(&mut self, detections: &Sender<String>) -> Result<Cycle, SessionError> {
        let frame = match self.source.next_frame()? {
            Some(frame) => frame,
            None => return Ok(Cycle::Finished(SessionEnd::EndOfStream)),
        };
        self.stats.frame_read();

        if let (Some(path), Some(writer)) = (&self.snapshot_path, &self.snapshot_writer) {
            if let Err(e) = writer.write(path, &frame) {
                log::warn!("failed to write debug snapshot {}: {e}", path.display());
            }
        }

        let bridge = &mut self.bridge;
        match self.gate.gate(Instant::now(), || bridge.input_queue_depth())? {
            GateDecision::Accept => {}
            GateDecision::Throttled => {
                log::debug!("throttling frame {}", frame.index());
                self.stats.throttled();
                return Ok(Cycle::Continue);
            }
            GateDecision::Congested => {
                log::debug!("fifo has elements, skipping frame {}", frame.index());
                self.stats.congested();
                return Ok(Cycle::Continue);
            }
        }

        tensor_encoder::encode_into(frame.data(), &mut self.tensor);

        let started = Instant::now();
        self.bridge.submit(&self.tensor)?;
        let scores = self.bridge.receive()?;
        self.stats.inference(started.elapsed());
        log::debug!("scores for frame {}: {scores:?}", frame.index());

        for label in self.decoder.decode(&scores) {
            if detections.send(label.to_string()).is_err() {
                return Ok(Cycle::Finished(SessionEnd::ConsumerClosed));
            }
            self.stats.detection();
        }

        Ok(Cycle::Continue)
    }
}
