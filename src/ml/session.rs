// ============================================================
// Layer 5 - Training Session Bookkeeping
// ============================================================
// Everything a training driver has to track around the network:
//
//   - the poly learning rate for the next iteration, written into
//     the optimiser's parameter groups
//   - the running training loss of the current epoch
//   - the best validation loss so far
//   - checkpoints every SAVE_EVERY epochs, flagged best or not
//   - where to pick up again after a restart
//
// The driver owns the network and optimiser; it calls `next_lr`
// before every optimiser step, `record_batch` after it, and
// `end_epoch` once validation is done.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::infra::checkpoint::{CheckpointManager, CheckpointState};
use crate::ml::meter::AverageMeter;
use crate::ml::scheduler::{ParamGroups, PolyLrConfig};

/// A checkpoint is written after every epoch `e` with `(e + 1) % SAVE_EVERY == 0`.
pub const SAVE_EVERY: usize = 10;

/// What `end_epoch` decided.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochOutcome {
    /// The validation loss beat every earlier epoch.
    pub is_best:    bool,
    /// Mean training loss over the epoch's batches.
    pub train_loss: f64,
    /// Regular checkpoint written for this epoch, if any.
    pub checkpoint: Option<PathBuf>,
}

pub struct TrainSession {
    schedule:    PolyLrConfig,
    groups:      ParamGroups,
    cur_iter:    usize,
    start_epoch: usize,
    best_loss:   f64,
    train_loss:  AverageMeter,
    checkpoints: Option<CheckpointManager>,
}

impl TrainSession {
    /// A fresh run starting at epoch 0, iteration 0.
    pub fn new(init_lr: f64, max_iter: usize) -> Self {
        Self {
            schedule:    PolyLrConfig::new(init_lr).with_max_iter(max_iter),
            groups:      ParamGroups::single(init_lr),
            cur_iter:    0,
            start_epoch: 0,
            best_loss:   f64::INFINITY,
            train_loss:  AverageMeter::new(),
            checkpoints: None,
        }
    }

    /// Continue after the epoch stored in `state`.
    ///
    /// `best_loss` is restored from the record, which holds the
    /// validation loss of the epoch the checkpoint was taken at.
    ///
    /// Fails when the stored iteration lies outside the stored schedule.
    pub fn resume<M, O>(state: &CheckpointState<M, O>) -> Result<Self> {
        let mut session = Self::new(state.init_lr, state.max_iter);
        let lr = session
            .schedule
            .apply(session.groups.as_mut_slice(), state.cur_iter)
            .context("checkpoint does not fit its own LR schedule")?;
        tracing::debug!("Resumed at iteration {} with lr={:.6e}", state.cur_iter, lr);

        session.cur_iter = state.cur_iter;
        session.start_epoch = state.epoch + 1;
        session.best_loss = state.best_loss;
        Ok(session)
    }

    /// Write periodic checkpoints through `manager`.
    pub fn with_checkpoints(mut self, manager: CheckpointManager) -> Self {
        self.checkpoints = Some(manager);
        self
    }

    /// Learning rate for the current iteration, applied to every
    /// parameter group; advances the iteration counter.
    pub fn next_lr(&mut self) -> Result<f64> {
        let lr = self.schedule.apply(self.groups.as_mut_slice(), self.cur_iter)?;
        self.cur_iter += 1;
        Ok(lr)
    }

    /// Record the mean loss of one training batch of `batch_size` samples.
    pub fn record_batch(&mut self, loss: f64, batch_size: usize) {
        self.train_loss.update_n(loss, batch_size);
    }

    /// Close epoch `epoch` with its validation loss.
    pub fn end_epoch<M: Serialize, O: Serialize>(
        &mut self,
        epoch:      usize,
        valid_loss: f64,
        model:      &M,
        optimizer:  &O,
    ) -> Result<EpochOutcome> {
        let is_best = valid_loss < self.best_loss;
        self.best_loss = self.best_loss.min(valid_loss);
        let train_loss = self.train_loss.avg();
        self.train_loss.reset();

        tracing::info!(
            "Epoch {:>3} | train_loss={:.4} | valid_loss={:.4} | best={:.4}{}",
            epoch,
            train_loss,
            valid_loss,
            self.best_loss,
            if is_best { " *" } else { "" },
        );

        let mut checkpoint = None;
        if let Some(manager) = &self.checkpoints {
            if (epoch + 1) % SAVE_EVERY == 0 {
                let state = CheckpointState {
                    epoch,
                    model,
                    optimizer,
                    cur_iter:  self.cur_iter,
                    max_iter:  self.schedule.max_iter,
                    best_loss: valid_loss,
                    init_lr:   self.schedule.init_lr,
                };
                let path = manager.save(&state, is_best)?;
                tracing::info!("Checkpoint saved: '{}'", path.display());
                checkpoint = Some(path);
            }
        }

        Ok(EpochOutcome { is_best, train_loss, checkpoint })
    }

    pub fn schedule(&self) -> &PolyLrConfig {
        &self.schedule
    }

    pub fn groups(&self) -> &ParamGroups {
        &self.groups
    }

    pub fn cur_iter(&self) -> usize {
        self.cur_iter
    }

    pub fn start_epoch(&self) -> usize {
        self.start_epoch
    }

    pub fn best_loss(&self) -> f64 {
        self.best_loss
    }
}
