#[cfg(feature = "mvnc")]
pub mod mvnc_bridge;
pub mod mvnc_status;
