use std::time::{Duration, Instant};

use crate::accelerator::domain::device_error::DeviceError;

/// Outcome of gating one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Submit this frame.
    Accept,
    /// Too soon after the last accepted submission; the device was not queried.
    Throttled,
    /// The input FIFO still holds an undrained request.
    Congested,
}

/// Best-effort latest-frame admission control for a single-slot input FIFO.
///
/// Rejected frames are dropped by the caller, never buffered.
pub struct CongestionController {
    min_interval: Duration,
    last_accepted: Instant,
}

impl CongestionController {
    /// `start` seeds the last-accepted timestamp, so with a non-zero interval
    /// frames arriving within `min_interval` of session start are throttled.
    pub fn new(min_interval: Duration, start: Instant) -> Self {
        Self {
            min_interval,
            last_accepted: start,
        }
    }

    pub fn last_accepted(&self) -> Instant {
        self.last_accepted
    }

    /// Decides whether the frame seen at `now` may be submitted.
    ///
    /// `queue_depth` is only invoked once the throttle interval has elapsed.
    /// The last-accepted timestamp moves only on `Accept`.
    pub fn gate<F>(&mut self, now: Instant, queue_depth: F) -> Result<GateDecision, DeviceError>
    where
        F: FnOnce() -> Result<usize, DeviceError>,
    {
        if now.saturating_duration_since(self.last_accepted) < self.min_interval {
            return Ok(GateDecision::Throttled);
        }
        if queue_depth()? > 0 {
            return Ok(GateDecision::Congested);
        }
        self.last_accepted = now;
        Ok(GateDecision::Accept)
    }
}
