pub mod frame_source;
pub mod snapshot_writer;
