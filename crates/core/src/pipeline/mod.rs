pub mod congestion_controller;
pub mod infrastructure;
pub mod session_stats;
pub mod stream_loop;

#[cfg(test)]
pub(crate) mod fake_bridge;
