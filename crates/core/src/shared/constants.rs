/// Bytes per 32-bit float element in the accelerator FIFOs.
pub const FLOAT_BYTES: u32 = 4;

/// Default confidence threshold; detections require a strictly greater score.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Rendezvous hand-off: the loop blocks on emission until the consumer takes the label.
pub const DEFAULT_DETECTION_CAPACITY: usize = 0;

/// JPEG quality used for the optional debug snapshot.
pub const SNAPSHOT_JPEG_QUALITY: u8 = 75;

/// Name under which the graph is registered with the device.
pub const GRAPH_NAME: &str = "faces";
