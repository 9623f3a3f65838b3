use std::time::{Duration, Instant};

/// Why a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The frame stream closed on a frame boundary.
    EndOfStream,
    /// The cancellation token was set.
    Cancelled,
    /// The consumer dropped the detection receiver.
    ConsumerClosed,
}

/// Counters describing one finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub end: SessionEnd,
    pub frames_read: usize,
    pub throttled: usize,
    pub congested: usize,
    pub submitted: usize,
    pub detections: usize,
    /// Mean submit-to-receive latency, or `None` if nothing was submitted.
    pub avg_inference_ms: Option<f64>,
    pub elapsed: Duration,
}

impl SessionSummary {
    pub fn summary_string(&self) -> String {
        let secs = self.elapsed.as_secs_f64();
        let mut lines = vec![format!(
            "Session summary ({:?}, {} frames, {secs:.1}s total):",
            self.end, self.frames_read
        )];
        lines.push(format!(
            "  submitted {}  throttled {}  congested {}",
            self.submitted, self.throttled, self.congested
        ));
        lines.push(format!("  detections: {}", self.detections));
        if let Some(avg) = self.avg_inference_ms {
            lines.push(format!("  inference: avg {avg:6.1}ms"));
        }
        if self.submitted > 0 && secs > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} inferences/s",
                self.submitted as f64 / secs
            ));
        }
        lines.join("\n")
    }
}

/// Running counters for the stream loop.
///
/// Only totals are kept so a session can run indefinitely in bounded memory.
pub struct SessionStats {
    start: Instant,
    frames_read: usize,
    throttled: usize,
    congested: usize,
    submitted: usize,
    detections: usize,
    inference_total_ms: f64,
}

impl SessionStats {
    pub fn new(start: Instant) -> Self {
        Self {
            start,
            frames_read: 0,
            throttled: 0,
            congested: 0,
            submitted: 0,
            detections: 0,
            inference_total_ms: 0.0,
        }
    }

    pub fn frame_read(&mut self) {
        self.frames_read += 1;
    }

    pub fn throttled(&mut self) {
        self.throttled += 1;
    }

    pub fn congested(&mut self) {
        self.congested += 1;
    }

    pub fn inference(&mut self, duration: Duration) {
        self.submitted += 1;
        self.inference_total_ms += duration.as_secs_f64() * 1000.0;
    }

    pub fn detection(&mut self) {
        self.detections += 1;
    }

    pub fn frames_read_count(&self) -> usize {
        self.frames_read
    }

    pub fn finish(&self, end: SessionEnd) -> SessionSummary {
        let avg_inference_ms = if self.submitted == 0 {
            None
        } else {
            Some(self.inference_total_ms / self.submitted as f64)
        };
        SessionSummary {
            end,
            frames_read: self.frames_read,
            throttled: self.throttled,
            congested: self.congested,
            submitted: self.submitted,
            detections: self.detections,
            avg_inference_ms,
            elapsed: self.start.elapsed(),
        }
    }
}
