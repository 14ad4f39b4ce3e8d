//! Rolling history of accepted metric samples
//!
//! The buffer is a bounded FIFO fed by the live-feed poller. Rows with
//! missing fields and the feed's all-zero "not ready" sentinel are
//! rejected at this boundary so downstream derivation only ever sees
//! complete samples.

use crate::models::{MetricSample, METRIC_COUNT};
use std::collections::VecDeque;
use tracing::debug;

/// Maximum number of retained samples
pub const HISTORY_CAPACITY: usize = 30;

/// Result of offering a raw row to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Sample was appended (and the oldest entry evicted if at capacity)
    Accepted,
    /// Row was shorter than [`METRIC_COUNT`] or had a null field
    RejectedIncomplete,
    /// Every field was exactly zero, the feed's "no data yet" sentinel
    RejectedSentinel,
}

impl AppendOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, AppendOutcome::Accepted)
    }
}

/// Bounded FIFO over [`MetricSample`], newest at the back
///
/// Arrival order is trusted as chronological order; the feed is the
/// only writer.
#[derive(Debug, Clone)]
pub struct SnapshotBuffer {
    samples: VecDeque<MetricSample>,
    capacity: usize,
}

impl SnapshotBuffer {
    /// Create a buffer with the default capacity of [`HISTORY_CAPACITY`]
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Validate and append a raw feed row
    ///
    /// Rejections leave the buffer unchanged and are logged only; the
    /// caller decides whether to count them.
    pub fn append(&mut self, raw: &[Option<f64>]) -> AppendOutcome {
        if raw.len() < METRIC_COUNT {
            debug!(fields = raw.len(), "Rejecting short sample row");
            return AppendOutcome::RejectedIncomplete;
        }

        let mut values = [0.0f64; METRIC_COUNT];
        for (i, slot) in raw.iter().take(METRIC_COUNT).enumerate() {
            match slot {
                Some(v) => values[i] = *v,
                None => {
                    debug!(index = i, "Rejecting sample row with null field");
                    return AppendOutcome::RejectedIncomplete;
                }
            }
        }

        if values.iter().all(|v| *v == 0.0) {
            debug!("Rejecting all-zero sentinel row");
            return AppendOutcome::RejectedSentinel;
        }

        self.samples.push_back(MetricSample::new(values));
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }

        AppendOutcome::Accepted
    }

    /// Copy of the current history, oldest first
    ///
    /// Ticks work off this copy so an in-flight request never observes
    /// a half-updated buffer.
    pub fn snapshot(&self) -> Vec<MetricSample> {
        self.samples.iter().copied().collect()
    }

    /// Most recently accepted sample
    pub fn latest(&self) -> Option<&MetricSample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SnapshotBuffer {
    fn default() -> Self {
        Self::new()
    }
}
