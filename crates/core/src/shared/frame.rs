use thiserror::Error;

/// Bytes per pixel of a raw frame (packed RGB).
pub const CHANNELS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameGeometryError {
    #[error("frame length {0} is not a positive multiple of 3")]
    NotRgb(usize),
    #[error("frame length {len} does not describe a square RGB image ({pixels} pixels)")]
    NotSquare { len: usize, pixels: usize },
}

/// Returns the side length of the square RGB image stored in `len` bytes.
///
/// The accelerator's input geometry is implied by its buffer size, so any
/// length that is not `3 * side * side` is rejected rather than truncated.
pub fn square_side(len: usize) -> Result<u32, FrameGeometryError> {
    if len == 0 || len % CHANNELS != 0 {
        return Err(FrameGeometryError::NotRgb(len));
    }
    let pixels = len / CHANNELS;
    let side = integer_sqrt(pixels);
    if side * side != pixels {
        return Err(FrameGeometryError::NotSquare { len, pixels });
    }
    u32::try_from(side).map_err(|_| FrameGeometryError::NotSquare { len, pixels })
}

fn integer_sqrt(n: usize) -> usize {
    let mut side = (n as f64).sqrt() as usize;
    while side * side > n {
        side -= 1;
    }
    while (side + 1) * (side + 1) <= n {
        side += 1;
    }
    side
}

/// A single raw frame: a square RGB image, 3 bytes per pixel, row-major.
///
/// Owned by exactly one cycle of the stream loop and dropped afterwards.
#[derive(Clone, Debug)]
pub struct RawFrame {
    data: Vec<u8>,
    side: u32,
    index: usize,
}

impl RawFrame {
    pub fn new(data: Vec<u8>, index: usize) -> Result<Self, FrameGeometryError> {
        let side = square_side(data.len())?;
        Ok(Self { data, side, index })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.side
    }

    pub fn height(&self) -> u32 {
        self.side
    }

    /// Zero-based position of the frame in the source stream.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
