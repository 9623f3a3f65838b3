use crate::accelerator::domain::device_error::DeviceError;

/// Session-scoped handle to one accelerator with one loaded graph and one
/// input/output FIFO pair.
///
/// Acquisition happens when the bridge is constructed; dropping it releases
/// the FIFOs, the graph and the device in reverse acquisition order.
/// Implementations need not be thread-safe: a bridge is created and used by
/// the single worker that drives the stream loop.
pub trait AcceleratorBridge {
    /// Bytes per element of the input FIFO, as negotiated with the graph.
    fn input_element_size(&self) -> usize;

    /// Bytes per element of the output FIFO, as negotiated with the graph.
    fn output_element_size(&self) -> usize;

    /// Number of queued-but-undrained elements in the input FIFO. Non-blocking.
    fn input_queue_depth(&mut self) -> Result<usize, DeviceError>;

    /// Writes one tensor into the input FIFO and queues an inference that
    /// reads it and writes to the output FIFO. Blocks until written.
    fn submit(&mut self, tensor: &[f32]) -> Result<(), DeviceError>;

    /// Blocks until the queued inference completes and returns its scores.
    fn receive(&mut self) -> Result<Vec<f32>, DeviceError>;
}

impl<B: AcceleratorBridge + ?Sized> AcceleratorBridge for Box<B> {
    fn input_element_size(&self) -> usize {
        (**self).input_element_size()
    }

    fn output_element_size(&self) -> usize {
        (**self).output_element_size()
    }

    fn input_queue_depth(&mut self) -> Result<usize, DeviceError> {
        (**self).input_queue_depth()
    }

    fn submit(&mut self, tensor: &[f32]) -> Result<(), DeviceError> {
        (**self).submit(tensor)
    }

    fn receive(&mut self) -> Result<Vec<f32>, DeviceError> {
        (**self).receive()
    }
}

/// Failure to bring a bridge up at session start.
#[derive(thiserror::Error, Debug)]
pub enum BridgeOpenError {
    #[error("failed to read graph file {path}: {source}")]
    GraphFile {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("accelerator support is not available: {0}")]
    Unsupported(String),
}
