use std::io::{ErrorKind, Read};

use crate::shared::frame::{square_side, FrameGeometryError, RawFrame};
use crate::video::domain::frame_source::{FrameSource, StreamError};

/// Frames an unbounded byte stream into fixed-size square RGB frames.
///
/// Short reads are accumulated until the frame is full; only end-of-stream
/// inside a frame is an error.
pub struct ByteStreamSource<R> {
    reader: R,
    frame_len: usize,
    frames_read: usize,
}

impl<R: Read + Send> ByteStreamSource<R> {
    pub fn new(reader: R, frame_len: usize) -> Result<Self, FrameGeometryError> {
        square_side(frame_len)?;
        Ok(Self {
            reader,
            frame_len,
            frames_read: 0,
        })
    }

    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    /// Fills `buf` completely. Returns the number of bytes read before EOF.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(StreamError::Read(e)),
            }
        }
        Ok(filled)
    }
}

impl<R: Read + Send> FrameSource for ByteStreamSource<R> {
    fn frame_len(&self) -> usize {
        self.frame_len
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame>, StreamError> {
        let mut buf = vec![0u8; self.frame_len];
        let received = self.fill(&mut buf)?;

        if received == 0 {
            return Ok(None);
        }
        if received < self.frame_len {
            return Err(StreamError::Truncated {
                expected: self.frame_len,
                received,
            });
        }

        let index = self.frames_read;
        self.frames_read += 1;
        // Length was validated in `new`.
        RawFrame::new(buf, index)
            .map(Some)
            .map_err(|e| StreamError::Read(std::io::Error::new(ErrorKind::InvalidData, e)))
    }
}
