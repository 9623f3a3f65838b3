use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::accelerator::domain::accelerator_bridge::{AcceleratorBridge, BridgeOpenError};
use crate::pipeline::session_stats::SessionSummary;
use crate::pipeline::stream_loop::{negotiated_frame_len, SessionError, StreamLoop};
use crate::shared::session_config::SessionConfig;
use crate::video::infrastructure::byte_stream_source::ByteStreamSource;
use crate::video::infrastructure::jpeg_snapshot_writer::JpegSnapshotWriter;

/// Control side of a running detection session.
pub struct SessionHandle {
    cancelled: Arc<AtomicBool>,
    worker: thread::JoinHandle<Result<SessionSummary, SessionError>>,
}

impl SessionHandle {
    /// Asks the worker to stop before its next frame read.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the worker and returns why the session ended.
    ///
    /// The detection receiver must be drained or dropped first, otherwise
    /// a worker blocked on emission never finishes.
    pub fn join(self) -> Result<SessionSummary, SessionError> {
        self.worker.join().map_err(|_| SessionError::Panicked)?
    }
}

/// Starts a dedicated worker that opens the accelerator, frames `reader`
/// and streams detected labels.
///
/// The returned receiver yields labels in frame order and disconnects
/// exactly once, after the device resources have been released. The
/// channel is bounded by `config.detection_capacity`; a consumer that
/// stops draining it stalls frame ingestion.
pub fn spawn<R, B, F>(
    config: SessionConfig,
    reader: R,
    open_bridge: F,
) -> (Receiver<String>, SessionHandle)
where
    R: Read + Send + 'static,
    B: AcceleratorBridge + 'static,
    F: FnOnce(&SessionConfig) -> Result<B, BridgeOpenError> + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded::<String>(config.detection_capacity);
    let cancelled = Arc::new(AtomicBool::new(false));
    let cancelled_clone = cancelled.clone();

    let worker = thread::spawn(move || {
        let result = run_session(&config, reader, open_bridge, &tx, &cancelled_clone);
        match &result {
            Ok(summary) => log::info!("\n\n{}", summary.summary_string()),
            Err(e) => log::error!("detection session terminated: {e}"),
        }
        result
    });

    (rx, SessionHandle { cancelled, worker })
}

fn run_session<R, B, F>(
    config: &SessionConfig,
    reader: R,
    open_bridge: F,
    tx: &Sender<String>,
    cancelled: &AtomicBool,
) -> Result<SessionSummary, SessionError>
where
    R: Read + Send,
    B: AcceleratorBridge,
    F: FnOnce(&SessionConfig) -> Result<B, BridgeOpenError>,
{
    config.validate()?;

    let bridge = open_bridge(config)?;
    let frame_len = negotiated_frame_len(&bridge)?;
    log::info!("reader input size: {frame_len}");

    let source = ByteStreamSource::new(reader, frame_len)
        .map_err(|source| SessionError::Geometry { frame_len, source })?;

    StreamLoop::new(config, bridge, source)?
        .with_snapshot_writer(Box::new(JpegSnapshotWriter::new()))
        .run(tx, cancelled)
}
