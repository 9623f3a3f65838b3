pub mod accelerator_bridge;
pub mod device_error;
