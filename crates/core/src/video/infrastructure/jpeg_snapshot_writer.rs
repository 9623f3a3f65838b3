use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;

use crate::shared::constants::SNAPSHOT_JPEG_QUALITY;
use crate::shared::frame::RawFrame;
use crate::video::domain::snapshot_writer::SnapshotWriter;

/// Overwrites a JPEG file with the most recent frame using the `image` crate.
pub struct JpegSnapshotWriter {
    quality: u8,
}

impl JpegSnapshotWriter {
    pub fn new() -> Self {
        Self {
            quality: SNAPSHOT_JPEG_QUALITY,
        }
    }

    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegSnapshotWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotWriter for JpegSnapshotWriter {
    fn write(&self, path: &Path, frame: &RawFrame) -> Result<(), Box<dyn std::error::Error>> {
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;

        let out = BufWriter::new(File::create(path)?);
        let mut encoder = JpegEncoder::new_with_quality(out, self.quality);
        encoder.encode_image(&img)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(side: u32, r: u8, g: u8, b: u8) -> RawFrame {
        let mut data = Vec::with_capacity((side * side * 3) as usize);
        for _ in 0..(side * side) {
            data.extend_from_slice(&[r, g, b]);
        }
        RawFrame::new(data, 0).unwrap()
    }

    #[test]
    fn test_write_creates_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.jpg");
        let writer = JpegSnapshotWriter::new();

        writer.write(&path, &make_frame(16, 10, 200, 30)).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 16);
        assert_eq!(
            image::ImageFormat::from_path(&path).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_write_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.jpg");
        let writer = JpegSnapshotWriter::with_quality(90);

        writer.write(&path, &make_frame(32, 0, 0, 0)).unwrap();
        writer.write(&path, &make_frame(8, 255, 255, 255)).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 8);
    }

    #[test]
    fn test_write_invalid_path_returns_error() {
        let writer = JpegSnapshotWriter::new();
        assert!(writer
            .write(Path::new("/nonexistent/dir/test.jpg"), &make_frame(4, 0, 0, 0))
            .is_err());
    }
}
