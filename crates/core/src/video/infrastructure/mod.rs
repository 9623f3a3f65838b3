pub mod byte_stream_source;
pub mod jpeg_snapshot_writer;
