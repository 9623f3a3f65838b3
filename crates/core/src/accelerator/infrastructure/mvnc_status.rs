use crate::accelerator::domain::device_error::{DeviceError, DeviceErrorKind};

/// Raw `ncStatus_t` value returned by every NCSDK v2 call.
pub type NcStatus = i32;

pub const NC_OK: NcStatus = 0;
pub const NC_BUSY: NcStatus = -1;
pub const NC_ERROR: NcStatus = -2;
pub const NC_OUT_OF_MEMORY: NcStatus = -3;
pub const NC_DEVICE_NOT_FOUND: NcStatus = -4;
pub const NC_INVALID_PARAMETERS: NcStatus = -5;
pub const NC_TIMEOUT: NcStatus = -6;
pub const NC_MVCMD_NOT_FOUND: NcStatus = -7;
pub const NC_NOT_ALLOCATED: NcStatus = -8;
pub const NC_UNAUTHORIZED: NcStatus = -9;
pub const NC_UNSUPPORTED_GRAPH_FILE: NcStatus = -10;
pub const NC_UNSUPPORTED_CONFIGURATION_FILE: NcStatus = -11;
pub const NC_UNSUPPORTED_FEATURE: NcStatus = -12;
pub const NC_MYRIAD_ERROR: NcStatus = -13;
pub const NC_INVALID_DATA_LENGTH: NcStatus = -14;
pub const NC_INVALID_HANDLE: NcStatus = -15;

pub fn kind_for(status: NcStatus) -> Option<DeviceErrorKind> {
    let kind = match status {
        NC_OK => return None,
        NC_BUSY => DeviceErrorKind::Busy,
        NC_ERROR => DeviceErrorKind::Error,
        NC_OUT_OF_MEMORY => DeviceErrorKind::OutOfMemory,
        NC_DEVICE_NOT_FOUND => DeviceErrorKind::DeviceNotFound,
        NC_INVALID_PARAMETERS => DeviceErrorKind::InvalidParameters,
        NC_TIMEOUT => DeviceErrorKind::Timeout,
        NC_MVCMD_NOT_FOUND => DeviceErrorKind::MvcmdNotFound,
        NC_NOT_ALLOCATED => DeviceErrorKind::NotAllocated,
        NC_UNAUTHORIZED => DeviceErrorKind::Unauthorized,
        NC_UNSUPPORTED_GRAPH_FILE => DeviceErrorKind::UnsupportedGraphFile,
        NC_UNSUPPORTED_CONFIGURATION_FILE => DeviceErrorKind::UnsupportedConfigurationFile,
        NC_UNSUPPORTED_FEATURE => DeviceErrorKind::UnsupportedFeature,
        NC_MYRIAD_ERROR => DeviceErrorKind::MyriadError,
        NC_INVALID_DATA_LENGTH => DeviceErrorKind::InvalidDataLength,
        NC_INVALID_HANDLE => DeviceErrorKind::InvalidHandle,
        other => DeviceErrorKind::Unknown(other),
    };
    Some(kind)
}

/// Converts a vendor status into `Ok(())` or a `DeviceError` tagged with `operation`.
pub fn check(status: NcStatus, operation: &'static str) -> Result<(), DeviceError> {
    match kind_for(status) {
        None => Ok(()),
        Some(kind) => Err(DeviceError::new(kind, operation)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_ok_is_success() {
        assert_eq!(check(NC_OK, "device open"), Ok(()));
    }

    #[rstest]
    #[case(NC_BUSY, DeviceErrorKind::Busy)]
    #[case(NC_ERROR, DeviceErrorKind::Error)]
    #[case(NC_OUT_OF_MEMORY, DeviceErrorKind::OutOfMemory)]
    #[case(NC_DEVICE_NOT_FOUND, DeviceErrorKind::DeviceNotFound)]
    #[case(NC_INVALID_PARAMETERS, DeviceErrorKind::InvalidParameters)]
    #[case(NC_TIMEOUT, DeviceErrorKind::Timeout)]
    #[case(NC_MVCMD_NOT_FOUND, DeviceErrorKind::MvcmdNotFound)]
    #[case(NC_NOT_ALLOCATED, DeviceErrorKind::NotAllocated)]
    #[case(NC_UNAUTHORIZED, DeviceErrorKind::Unauthorized)]
    #[case(NC_UNSUPPORTED_GRAPH_FILE, DeviceErrorKind::UnsupportedGraphFile)]
    #[case(
        NC_UNSUPPORTED_CONFIGURATION_FILE,
        DeviceErrorKind::UnsupportedConfigurationFile
    )]
    #[case(NC_UNSUPPORTED_FEATURE, DeviceErrorKind::UnsupportedFeature)]
    #[case(NC_MYRIAD_ERROR, DeviceErrorKind::MyriadError)]
    #[case(NC_INVALID_DATA_LENGTH, DeviceErrorKind::InvalidDataLength)]
    #[case(NC_INVALID_HANDLE, DeviceErrorKind::InvalidHandle)]
    #[case(-77, DeviceErrorKind::Unknown(-77))]
    fn test_status_maps_to_kind(#[case] status: NcStatus, #[case] kind: DeviceErrorKind) {
        let err = check(status, "fifo write").unwrap_err();
        assert_eq!(err.kind, kind);
        assert_eq!(err.operation, "fifo write");
    }

    #[test]
    fn test_only_busy_and_timeout_are_retryable() {
        let retryable: Vec<NcStatus> = (-15..=-1)
            .filter(|&s| kind_for(s).is_some_and(|k| k.is_retryable()))
            .collect();
        assert_eq!(retryable, vec![NC_TIMEOUT, NC_BUSY]);
    }
}
