use thiserror::Error;

/// Failure classes reported by the accelerator's device layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceErrorKind {
    Busy,
    Error,
    OutOfMemory,
    DeviceNotFound,
    InvalidParameters,
    Timeout,
    MvcmdNotFound,
    NotAllocated,
    Unauthorized,
    UnsupportedGraphFile,
    UnsupportedConfigurationFile,
    UnsupportedFeature,
    MyriadError,
    InvalidDataLength,
    InvalidHandle,
    Unknown(i32),
}

impl DeviceErrorKind {
    /// Busy and timeout conditions may clear on their own; everything else is fatal.
    pub fn is_retryable(self) -> bool {
        matches!(self, DeviceErrorKind::Busy | DeviceErrorKind::Timeout)
    }

    pub fn description(self) -> String {
        let text = match self {
            DeviceErrorKind::Busy => "the device is busy; retry later",
            DeviceErrorKind::Error => "an unexpected error was encountered during the call",
            DeviceErrorKind::OutOfMemory => "the host is out of memory",
            DeviceErrorKind::DeviceNotFound => "there is no device at the given index or name",
            DeviceErrorKind::InvalidParameters => {
                "at least one of the given parameters is invalid in the context of the call"
            }
            DeviceErrorKind::Timeout => "timeout in the communication with the device",
            DeviceErrorKind::MvcmdNotFound => {
                "the firmware file used to boot the device was not found"
            }
            DeviceErrorKind::NotAllocated => "the graph or fifo has not been allocated",
            DeviceErrorKind::Unauthorized => "an unauthorized operation has been attempted",
            DeviceErrorKind::UnsupportedGraphFile => {
                "the graph file was compiled with an incompatible toolkit version"
            }
            DeviceErrorKind::UnsupportedConfigurationFile => "unsupported configuration file",
            DeviceErrorKind::UnsupportedFeature => {
                "the operation uses a feature this firmware version does not support"
            }
            DeviceErrorKind::MyriadError => "the VPU reported an error; see the device debug info",
            DeviceErrorKind::InvalidDataLength => {
                "an invalid data length was passed when getting or setting an option"
            }
            DeviceErrorKind::InvalidHandle => "an invalid handle was passed to a function",
            DeviceErrorKind::Unknown(code) => return format!("unknown device status {code}"),
        };
        text.to_string()
    }
}

/// A device-layer failure together with the operation that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed: {}", .kind.description())]
pub struct DeviceError {
    pub kind: DeviceErrorKind,
    pub operation: &'static str,
}

impl DeviceError {
    pub fn new(kind: DeviceErrorKind, operation: &'static str) -> Self {
        Self { kind, operation }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
