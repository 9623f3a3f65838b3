//! Streaming detection against a FIFO-driven neural compute accelerator.
//!
//! Raw RGB frames are read from a byte stream, admitted under a throttle and
//! a single-slot congestion check, normalized into float tensors, run on the
//! device and decoded into labels that are streamed to a consumer.

pub mod accelerator;
pub mod detection;
pub mod encoding;
pub mod pipeline;
pub mod shared;
pub mod video;
