// ============================================================
// Layer 5 - Polynomial Learning-Rate Schedule
// ============================================================
// lr = init_lr * (1 - iter / max_iter) ^ power
//
// The rate starts at init_lr, reaches exactly 0 at max_iter and
// falls faster towards the end when power < 1. Burn optimisers
// take the learning rate as an argument to `step`, so the value
// is written into plain ParamGroup records the training driver
// reads from, instead of into optimiser internals.
//
// Reference: Chen et al. (2017) DeepLab, "poly" LR policy

use anyhow::{ensure, Result};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::traits::LearningRateHolder;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct PolyLrConfig {
    /// Learning rate at iteration 0.
    pub init_lr: f64,
    /// Iteration at which the rate reaches zero.
    #[config(default = 100)]
    pub max_iter: usize,
    /// Polynomial exponent.
    #[config(default = 0.9)]
    pub power: f64,
}

impl PolyLrConfig {
    /// Learning rate at `iter`, without touching any parameter group.
    pub fn lr_at(&self, iter: usize) -> Result<f64> {
        ensure!(self.max_iter > 0, "poly schedule needs max_iter > 0");
        ensure!(
            iter <= self.max_iter,
            "iteration {iter} is past the end of the poly schedule (max_iter = {})",
            self.max_iter
        );
        let progress = iter as f64 / self.max_iter as f64;
        Ok(self.init_lr * (1.0 - progress).powf(self.power))
    }

    /// Compute the rate at `iter` and write it into every group.
    pub fn apply<G: LearningRateHolder>(&self, groups: &mut [G], iter: usize) -> Result<f64> {
        poly_lr_scheduler(groups, self.init_lr, iter, self.max_iter, self.power)
    }
}

/// Polynomial decay of the learning rate.
///
/// Writes the decayed rate into every group and returns it. Fails
/// without modifying any group when `iter > max_iter` (the base of
/// the power would be negative) or when `max_iter` is zero.
pub fn poly_lr_scheduler<G: LearningRateHolder>(
    groups:   &mut [G],
    init_lr:  f64,
    iter:     usize,
    max_iter: usize,
    power:    f64,
) -> Result<f64> {
    let lr = PolyLrConfig { init_lr, max_iter, power }.lr_at(iter)?;
    for group in groups.iter_mut() {
        group.set_learning_rate(lr);
    }
    Ok(lr)
}

// ─── Parameter groups ─────────────────────────────────────────────────────────

/// A named set of parameters sharing one learning rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGroup {
    pub name: String,
    pub lr:   f64,
}

impl ParamGroup {
    pub fn new(name: impl Into<String>, lr: f64) -> Self {
        Self { name: name.into(), lr }
    }
}

impl LearningRateHolder for ParamGroup {
    fn learning_rate(&self) -> f64 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.lr = lr;
    }
}

/// The parameter groups of one optimiser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamGroups {
    groups: Vec<ParamGroup>,
}

impl ParamGroups {
    pub fn new(groups: Vec<ParamGroup>) -> Self {
        Self { groups }
    }

    /// The common case: every parameter in one group.
    pub fn single(lr: f64) -> Self {
        Self::new(vec![ParamGroup::new("default", lr)])
    }

    pub fn as_slice(&self) -> &[ParamGroup] {
        &self.groups
    }

    pub fn as_mut_slice(&mut self) -> &mut [ParamGroup] {
        &mut self.groups
    }

    /// Learning rate of the first group, which is what a
    /// single-group burn optimiser receives in `step`.
    pub fn lr(&self) -> Option<f64> {
        self.groups.first().map(LearningRateHolder::learning_rate)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<ParamGroup> {
        vec![
            ParamGroup::new("encoder", 0.5),
            ParamGroup::new("decoder", 0.25),
            ParamGroup::new("propagation", 0.125),
        ]
    }

    #[test]
    fn test_defaults() {
        let cfg = PolyLrConfig::new(0.01);
        assert_eq!(cfg.max_iter, 100);
        assert!((cfg.power - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_endpoints() {
        let cfg = PolyLrConfig::new(0.001).with_max_iter(1000);
        assert_eq!(cfg.lr_at(0).unwrap(), 0.001);
        assert_eq!(cfg.lr_at(1000).unwrap(), 0.0);
    }

    #[test]
    fn test_matches_formula() {
        let cfg = PolyLrConfig::new(0.1).with_max_iter(200).with_power(2.0);
        // (1 - 50/200)^2 = 0.5625
        assert!((cfg.lr_at(50).unwrap() - 0.05625).abs() < 1e-12);
    }

    #[test]
    fn test_bounded_and_non_increasing() {
        let cfg = PolyLrConfig::new(0.01).with_max_iter(500);
        let mut prev = f64::INFINITY;
        for iter in 0..=cfg.max_iter {
            let lr = cfg.lr_at(iter).unwrap();
            assert!(lr >= 0.0 && lr <= cfg.init_lr, "lr {lr} out of range at {iter}");
            assert!(lr <= prev, "lr increased at iteration {iter}");
            prev = lr;
        }
    }

    #[test]
    fn test_every_group_receives_the_returned_rate() {
        let mut groups = groups();
        let lr = poly_lr_scheduler(&mut groups, 0.001, 30, 100, 0.9).unwrap();
        for group in &groups {
            assert_eq!(group.learning_rate(), lr);
        }
    }

    #[test]
    fn test_past_max_iter_is_rejected_and_groups_untouched() {
        let mut groups = groups();
        let before = groups.clone();
        assert!(poly_lr_scheduler(&mut groups, 0.001, 101, 100, 0.9).is_err());
        assert_eq!(groups, before);
    }

    #[test]
    fn test_zero_max_iter_is_rejected() {
        let mut groups = groups();
        assert!(poly_lr_scheduler(&mut groups, 0.001, 0, 0, 0.9).is_err());
    }

    #[test]
    fn test_apply_through_param_groups() {
        let cfg = PolyLrConfig::new(1.0).with_max_iter(4).with_power(1.0);
        let mut groups = ParamGroups::single(1.0);
        let lr = cfg.apply(groups.as_mut_slice(), 1).unwrap();
        assert!((lr - 0.75).abs() < 1e-12);
        assert_eq!(groups.lr(), Some(lr));
    }
}
