use std::path::Path;

use crate::shared::frame::RawFrame;

/// Writes a frame to an image file for offline inspection.
pub trait SnapshotWriter: Send {
    fn write(&self, path: &Path, frame: &RawFrame) -> Result<(), Box<dyn std::error::Error>>;
}
