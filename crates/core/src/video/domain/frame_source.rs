use thiserror::Error;

use crate::shared::frame::RawFrame;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("failed to read frame stream: {0}")]
    Read(#[from] std::io::Error),
    #[error("frame stream ended mid-frame: received {received} of {expected} bytes")]
    Truncated { expected: usize, received: usize },
}

/// Sequential supplier of fixed-size raw frames.
pub trait FrameSource: Send {
    /// Bytes per frame this source delivers.
    fn frame_len(&self) -> usize;

    /// Blocks until a full frame is available.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly on a frame boundary.
    fn next_frame(&mut self) -> Result<Option<RawFrame>, StreamError>;
}
