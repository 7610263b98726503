// ============================================================
// Layer 4 - Train/Validation Splitter
// ============================================================
// Randomly shuffles samples and splits them into two sets:
//   - Training set:   used to update model weights
//   - Validation set: used to measure performance on unseen data
//
// The split is given as an integer percentage (--valid_portion),
// and the validation count is rounded down:
//   431 samples, valid_portion = 20 → 86 valid, 345 train
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use anyhow::{ensure, Result};
use rand::{seq::SliceRandom, Rng};

/// Shuffle `samples` with `rng` and split off `valid_portion` percent
/// of them as the validation set.
///
/// # Returns
/// A tuple (train_samples, valid_samples)
pub fn split_by_valid_portion<T, R: Rng + ?Sized>(
    mut samples:   Vec<T>,
    valid_portion: u32,
    rng:           &mut R,
) -> Result<(Vec<T>, Vec<T>)> {
    ensure!(
        valid_portion <= 100,
        "valid_portion must be a percentage in 0..=100, got {valid_portion}"
    );

    samples.shuffle(rng);

    let total     = samples.len();
    let num_valid = total * valid_portion as usize / 100;

    // split_off(n) removes elements [n..] from the Vec and returns them
    let valid = samples.split_off(total - num_valid);

    tracing::debug!(
        "Dataset split: {} training, {} validation ({}%)",
        samples.len(),
        valid.len(),
        valid_portion,
    );

    Ok((samples, valid))
}
