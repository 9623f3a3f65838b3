use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::accelerator::domain::accelerator_bridge::AcceleratorBridge;
use crate::accelerator::domain::device_error::{DeviceError, DeviceErrorKind};

/// What a `FakeBridge` observed; shared with the test after the bridge is moved.
#[derive(Default, Debug)]
pub struct BridgeLog {
    pub submitted: Vec<Vec<f32>>,
    pub depth_queries: usize,
    pub released: bool,
}

/// Scripted accelerator: replays queue depths and outputs in order.
///
/// Unscripted depth queries report an empty queue; an exhausted output
/// script reports `NotAllocated`.
pub struct FakeBridge {
    input_size: usize,
    output_size: usize,
    depths: VecDeque<usize>,
    outputs: VecDeque<Result<Vec<f32>, DeviceError>>,
    submit_error: Option<DeviceError>,
    log: Arc<Mutex<BridgeLog>>,
}

impl FakeBridge {
    pub fn new(input_size: usize, output_size: usize) -> (Self, Arc<Mutex<BridgeLog>>) {
        let log = Arc::new(Mutex::new(BridgeLog::default()));
        let bridge = Self {
            input_size,
            output_size,
            depths: VecDeque::new(),
            outputs: VecDeque::new(),
            submit_error: None,
            log: log.clone(),
        };
        (bridge, log)
    }

    pub fn with_depths(mut self, depths: &[usize]) -> Self {
        self.depths.extend(depths);
        self
    }

    pub fn with_output(mut self, scores: &[f32]) -> Self {
        self.outputs.push_back(Ok(scores.to_vec()));
        self
    }

    pub fn with_receive_error(mut self, kind: DeviceErrorKind) -> Self {
        self.outputs.push_back(Err(DeviceError::new(kind, "fifo read")));
        self
    }

    pub fn with_submit_error(mut self, kind: DeviceErrorKind) -> Self {
        self.submit_error = Some(DeviceError::new(kind, "fifo write"));
        self
    }
}

impl AcceleratorBridge for FakeBridge {
    fn input_element_size(&self) -> usize {
        self.input_size
    }

    fn output_element_size(&self) -> usize {
        self.output_size
    }

    fn input_queue_depth(&mut self) -> Result<usize, DeviceError> {
        self.log.lock().unwrap().depth_queries += 1;
        Ok(self.depths.pop_front().unwrap_or(0))
    }

    fn submit(&mut self, tensor: &[f32]) -> Result<(), DeviceError> {
        if let Some(err) = self.submit_error.clone() {
            return Err(err);
        }
        self.log.lock().unwrap().submitted.push(tensor.to_vec());
        Ok(())
    }

    fn receive(&mut self) -> Result<Vec<f32>, DeviceError> {
        self.outputs.pop_front().unwrap_or_else(|| {
            Err(DeviceError::new(DeviceErrorKind::NotAllocated, "fifo read"))
        })
    }
}

impl Drop for FakeBridge {
    fn drop(&mut self) {
        if let Ok(mut log) = self.log.lock() {
            log.released = true;
        }
    }
}
