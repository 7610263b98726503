// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Prepares a training run for an external matting network:
//
//   Step 1: Read the training names      (Layer 4 - data)
//   Step 2: Size the poly LR schedule    (Layer 5 - ml)
//   Step 3: Resume from a checkpoint     (Layer 6 - infra)
//   Step 4: Attach checkpoint saving     (Layer 6 - infra)
//   Step 5: Log the per-epoch LR plan
//
// The returned TrainSession is what a training loop drives with
// `next_lr` per batch and `end_epoch` per epoch.
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::data::names::{read_name_list, TRAIN_NAMES};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::session::TrainSession;

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub raw_data_path: PathBuf,
    pub batch_size:    usize,
    pub epochs:        usize,
    pub lr:            f64,
    pub ckpt_path:     Option<PathBuf>,
    pub save_ckpt:     bool,
    pub resume:        bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            raw_data_path: PathBuf::from("/data/datasets/im/AdaMatting/"),
            batch_size:    64,
            epochs:        20,
            lr:            0.001,
            ckpt_path:     None,
            save_ckpt:     false,
            resume:        false,
        }
    }
}

pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainSession> {
        let cfg = &self.config;
        ensure!(cfg.batch_size > 0, "batch_size must be positive");
        ensure!(cfg.epochs > 0, "epochs must be positive");

        // ── Step 1: Training names ───────────────────────────────────────────
        let names = read_name_list(&cfg.raw_data_path.join(TRAIN_NAMES))?;
        ensure!(!names.is_empty(), "{} is empty; run --mode=prep first", TRAIN_NAMES);

        // ── Step 2: Schedule length ──────────────────────────────────────────
        let iters_per_epoch = names.len().div_ceil(cfg.batch_size);
        let max_iter = cfg.epochs * iters_per_epoch;
        tracing::info!(
            "{} training samples | {} iterations/epoch | {} iterations total",
            names.len(),
            iters_per_epoch,
            max_iter
        );

        // ── Step 3: Fresh or resumed session ─────────────────────────────────
        let mut session = if cfg.resume {
            self.resumed_session(max_iter)?
        } else {
            TrainSession::new(cfg.lr, max_iter)
        };

        // ── Step 4: Periodic checkpoints ─────────────────────────────────────
        if cfg.save_ckpt {
            let Some(dir) = &cfg.ckpt_path else {
                bail!("--save_ckpt requires --ckpt_path");
            };
            session = session.with_checkpoints(CheckpointManager::new(dir)?);
        }

        // ── Step 5: LR plan ──────────────────────────────────────────────────
        for step in lr_plan(&session, cfg.epochs, iters_per_epoch) {
            tracing::info!(
                "Epoch {:>3} starts at iter {:>6} | lr={:.6e}",
                step.epoch,
                step.iter,
                step.lr
            );
        }

        Ok(session)
    }

    fn resumed_session(&self, max_iter: usize) -> Result<TrainSession> {
        let Some(dir) = &self.config.ckpt_path else {
            bail!("--resume requires --ckpt_path");
        };
        let manager = CheckpointManager::new(dir)?;
        // Model and optimizer payloads belong to the network driver.
        match manager.latest::<Value, Value>()? {
            Some((path, state)) => {
                tracing::info!(
                    "Resuming from '{}': epoch {} | iter {}/{} | best_loss={:.4}",
                    path.display(),
                    state.epoch + 1,
                    state.cur_iter,
                    state.max_iter,
                    state.best_loss
                );
                TrainSession::resume(&state)
            }
            None => {
                tracing::warn!("No checkpoint in '{}'; starting from scratch", dir.display());
                Ok(TrainSession::new(self.config.lr, max_iter))
            }
        }
    }
}

/// Learning rate at the first iteration of one upcoming epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochLr {
    pub epoch: usize,
    pub iter:  usize,
    pub lr:    f64,
}

/// The rate each remaining epoch starts with, counted on from the
/// session's current iteration. Stops with a warning at the first
/// epoch the session's schedule no longer covers.
pub fn lr_plan(session: &TrainSession, epochs: usize, iters_per_epoch: usize) -> Vec<EpochLr> {
    let start = session.start_epoch();
    let mut plan = Vec::with_capacity(epochs.saturating_sub(start));
    for epoch in start..epochs {
        let iter = session.cur_iter() + (epoch - start) * iters_per_epoch;
        match session.schedule().lr_at(iter) {
            Ok(lr) => plan.push(EpochLr { epoch, iter, lr }),
            Err(err) => {
                tracing::warn!(
                    "Schedule ends before epoch {} of {}: {:#}",
                    epoch,
                    epochs,
                    err
                );
                break;
            }
        }
    }
    plan
}
