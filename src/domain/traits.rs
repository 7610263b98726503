// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// Capabilities that the ML and data layers program against:
//
//   LearningRateHolder - anything carrying a mutable learning
//                        rate (an optimiser parameter group)
//   MatteSource        - anything that can hand out evaluation
//                        samples by name
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use burn::prelude::*;

use crate::domain::sample::MattePrediction;

// ─── LearningRateHolder ───────────────────────────────────────────────────────
/// A record whose learning rate a scheduler may overwrite.
///
/// Implementations:
///   - ParamGroup → one named optimiser parameter group
pub trait LearningRateHolder {
    /// The learning rate currently stored in this record.
    fn learning_rate(&self) -> f64;

    /// Replace the stored learning rate.
    fn set_learning_rate(&mut self, lr: f64);
}

// ─── MatteSource ──────────────────────────────────────────────────────────────
/// Any component that can load prediction / ground-truth / trimap
/// triples for evaluation.
///
/// Implementations:
///   - MatteDirectory → pred/, alpha/ and trimap/ image folders
pub trait MatteSource<B: Backend> {
    /// Names of every sample this source can load, in evaluation order.
    fn names(&self) -> Result<Vec<String>>;

    /// Load a single sample onto `device`.
    fn load(&self, name: &str, device: &B::Device) -> Result<MattePrediction<B>>;
}
