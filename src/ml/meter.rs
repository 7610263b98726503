// ============================================================
// Layer 5 - Running Average Meter
// ============================================================
// Tracks a scalar stream (batch loss, per-image MSE or SAD) as
// last value, sum, count and mean. Updates may carry a weight n,
// e.g. the batch size when the value is a batch mean.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// Keeps track of the most recent value, average, sum and count of a metric.
///
/// `avg` reads as `0.0` until the first update; it is never computed
/// from an empty count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageMeter {
    val:   f64,
    avg:   f64,
    sum:   f64,
    count: usize,
}

impl AverageMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record one observation.
    pub fn update(&mut self, val: f64) {
        self.update_n(val, 1);
    }

    /// Record `val` as the mean of `n` observations (e.g. a batch loss).
    pub fn update_n(&mut self, val: f64, n: usize) {
        self.val = val;
        self.sum += val * n as f64;
        self.count += n;
        if self.count > 0 {
            self.avg = self.sum / self.count as f64;
        }
    }

    pub fn val(&self) -> f64 {
        self.val
    }

    pub fn avg(&self) -> f64 {
        self.avg
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
