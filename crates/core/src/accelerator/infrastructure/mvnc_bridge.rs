use std::ffi::CString;
use std::fs;
use std::os::raw::{c_int, c_uint, c_void};
use std::path::Path;
use std::ptr;

use crate::accelerator::domain::accelerator_bridge::{AcceleratorBridge, BridgeOpenError};
use crate::accelerator::domain::device_error::{DeviceError, DeviceErrorKind};
use crate::accelerator::infrastructure::mvnc_status::{check, NcStatus};
use crate::shared::constants::{FLOAT_BYTES, GRAPH_NAME};

const NC_RO_FIFO_WRITE_FILL_LEVEL: c_int = 2006;
const NC_RO_FIFO_ELEMENT_DATA_SIZE: c_int = 2010;

mod sys {
    use std::os::raw::{c_char, c_int, c_uint, c_void};

    use super::NcStatus;

    #[repr(C)]
    pub struct NcDeviceHandle {
        _private: [u8; 0],
    }

    #[repr(C)]
    pub struct NcGraphHandle {
        _private: [u8; 0],
    }

    #[repr(C)]
    pub struct NcFifoHandle {
        _private: [u8; 0],
    }

    #[link(name = "mvnc")]
    extern "C" {
        pub fn ncDeviceCreate(index: c_int, device: *mut *mut NcDeviceHandle) -> NcStatus;
        pub fn ncDeviceOpen(device: *mut NcDeviceHandle) -> NcStatus;
        pub fn ncDeviceClose(device: *mut NcDeviceHandle) -> NcStatus;
        pub fn ncDeviceDestroy(device: *mut *mut NcDeviceHandle) -> NcStatus;

        pub fn ncGraphCreate(name: *const c_char, graph: *mut *mut NcGraphHandle) -> NcStatus;
        pub fn ncGraphAllocateWithFifos(
            device: *mut NcDeviceHandle,
            graph: *mut NcGraphHandle,
            graph_buffer: *const c_void,
            graph_buffer_length: c_uint,
            input_fifo: *mut *mut NcFifoHandle,
            output_fifo: *mut *mut NcFifoHandle,
        ) -> NcStatus;
        pub fn ncGraphQueueInference(
            graph: *mut NcGraphHandle,
            fifos_in: *mut *mut NcFifoHandle,
            in_fifo_count: c_uint,
            fifos_out: *mut *mut NcFifoHandle,
            out_fifo_count: c_uint,
        ) -> NcStatus;
        pub fn ncGraphDestroy(graph: *mut *mut NcGraphHandle) -> NcStatus;

        pub fn ncFifoGetOption(
            fifo: *mut NcFifoHandle,
            option: c_int,
            data: *mut c_void,
            data_length: *mut c_uint,
        ) -> NcStatus;
        pub fn ncFifoWriteElem(
            fifo: *mut NcFifoHandle,
            input_tensor: *const c_void,
            input_tensor_length: *mut c_uint,
            user_param: *mut c_void,
        ) -> NcStatus;
        pub fn ncFifoReadElem(
            fifo: *mut NcFifoHandle,
            output_data: *mut c_void,
            output_data_len: *mut c_uint,
            user_param: *mut *mut c_void,
        ) -> NcStatus;
        pub fn ncFifoDestroy(fifo: *mut *mut NcFifoHandle) -> NcStatus;
    }
}

struct Device {
    raw: *mut sys::NcDeviceHandle,
    opened: bool,
}

impl Device {
    fn create(index: i32) -> Result<Self, DeviceError> {
        let mut raw = ptr::null_mut();
        check(unsafe { sys::ncDeviceCreate(index, &mut raw) }, "device create")?;
        Ok(Self { raw, opened: false })
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        check(unsafe { sys::ncDeviceOpen(self.raw) }, "device open")?;
        self.opened = true;
        Ok(())
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        unsafe {
            if self.opened {
                sys::ncDeviceClose(self.raw);
            }
            sys::ncDeviceDestroy(&mut self.raw);
        }
    }
}

struct Graph {
    raw: *mut sys::NcGraphHandle,
}

impl Graph {
    fn create(name: &str) -> Result<Self, DeviceError> {
        let name = CString::new(name)
            .map_err(|_| DeviceError::new(DeviceErrorKind::InvalidParameters, "graph create"))?;
        let mut raw = ptr::null_mut();
        check(unsafe { sys::ncGraphCreate(name.as_ptr(), &mut raw) }, "graph create")?;
        Ok(Self { raw })
    }
}

impl Drop for Graph {
    fn drop(&mut self) {
        unsafe {
            sys::ncGraphDestroy(&mut self.raw);
        }
    }
}

struct Fifo {
    raw: *mut sys::NcFifoHandle,
}

impl Fifo {
    fn option_u32(&self, option: c_int, operation: &'static str) -> Result<u32, DeviceError> {
        let mut value: c_uint = 0;
        let mut len = std::mem::size_of::<c_uint>() as c_uint;
        check(
            unsafe {
                sys::ncFifoGetOption(self.raw, option, &mut value as *mut c_uint as *mut c_void, &mut len)
            },
            operation,
        )?;
        Ok(value)
    }

    fn option_i32(&self, option: c_int, operation: &'static str) -> Result<i32, DeviceError> {
        let mut value: c_int = 0;
        let mut len = std::mem::size_of::<c_int>() as c_uint;
        check(
            unsafe {
                sys::ncFifoGetOption(self.raw, option, &mut value as *mut c_int as *mut c_void, &mut len)
            },
            operation,
        )?;
        Ok(value)
    }
}

impl Drop for Fifo {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            unsafe {
                sys::ncFifoDestroy(&mut self.raw);
            }
        }
    }
}

/// NCSDK v2 device with one graph allocated alongside its default FIFO pair.
///
/// Field order is release order: FIFOs, then graph, then device.
pub struct MvncBridge {
    input: Fifo,
    output: Fifo,
    graph: Graph,
    _device: Device,
    input_size: u32,
    output_size: u32,
}

impl MvncBridge {
    /// Opens device `index`, loads the compiled graph at `graph_path` and
    /// negotiates the FIFO element sizes.
    pub fn open(index: i32, graph_path: &Path) -> Result<Self, BridgeOpenError> {
        let graph_bytes = fs::read(graph_path).map_err(|e| BridgeOpenError::GraphFile {
            path: graph_path.to_path_buf(),
            source: e,
        })?;
        let graph_len = c_uint::try_from(graph_bytes.len())
            .map_err(|_| DeviceError::new(DeviceErrorKind::InvalidDataLength, "graph allocate"))?;

        let mut device = Device::create(index)?;
        device.open()?;
        let graph = Graph::create(GRAPH_NAME)?;

        let mut input_raw = ptr::null_mut();
        let mut output_raw = ptr::null_mut();
        let status = unsafe {
            sys::ncGraphAllocateWithFifos(
                device.raw,
                graph.raw,
                graph_bytes.as_ptr() as *const c_void,
                graph_len,
                &mut input_raw,
                &mut output_raw,
            )
        };
        let input = Fifo { raw: input_raw };
        let output = Fifo { raw: output_raw };
        check(status, "graph allocate")?;

        let input_size = input.option_u32(NC_RO_FIFO_ELEMENT_DATA_SIZE, "input fifo size")?;
        let output_size = output.option_u32(NC_RO_FIFO_ELEMENT_DATA_SIZE, "output fifo size")?;
        log::info!("fifo input/output sizes: {input_size}/{output_size}");

        Ok(Self {
            input,
            output,
            graph,
            _device: device,
            input_size,
            output_size,
        })
    }
}

impl AcceleratorBridge for MvncBridge {
    fn input_element_size(&self) -> usize {
        self.input_size as usize
    }

    fn output_element_size(&self) -> usize {
        self.output_size as usize
    }

    fn input_queue_depth(&mut self) -> Result<usize, DeviceError> {
        let level = self
            .input
            .option_i32(NC_RO_FIFO_WRITE_FILL_LEVEL, "fifo fill level")?;
        Ok(level.max(0) as usize)
    }

    fn submit(&mut self, tensor: &[f32]) -> Result<(), DeviceError> {
        if tensor.len() * FLOAT_BYTES as usize != self.input_size as usize {
            return Err(DeviceError::new(DeviceErrorKind::InvalidDataLength, "fifo write"));
        }
        let mut len: c_uint = self.input_size;
        check(
            unsafe {
                sys::ncFifoWriteElem(
                    self.input.raw,
                    tensor.as_ptr() as *const c_void,
                    &mut len,
                    ptr::null_mut(),
                )
            },
            "fifo write",
        )?;
        check(
            unsafe {
                sys::ncGraphQueueInference(self.graph.raw, &mut self.input.raw, 1, &mut self.output.raw, 1)
            },
            "queue inference",
        )
    }

    fn receive(&mut self) -> Result<Vec<f32>, DeviceError> {
        let mut scores = vec![0f32; (self.output_size / FLOAT_BYTES) as usize];
        let mut len: c_uint = self.output_size;
        let mut user: *mut c_void = ptr::null_mut();
        check(
            unsafe {
                sys::ncFifoReadElem(
                    self.output.raw,
                    scores.as_mut_ptr() as *mut c_void,
                    &mut len,
                    &mut user,
                )
            },
            "fifo read",
        )?;
        Ok(scores)
    }
}
