// ============================================================
// Layer 2 - PrepUseCase
// ============================================================
// Builds the train / validation name lists for a dataset:
//
//   Step 1: List ground-truth mattes   (<raw>/alpha/)
//   Step 2: Shuffle and split          (--valid_portion percent)
//   Step 3: Write train_names.txt and valid_names.txt into <raw>/

use anyhow::{ensure, Result};
use rand::Rng;
use std::path::PathBuf;

use crate::data::{
    loader::ALPHA_DIR,
    names::{list_images, write_name_list, TRAIN_NAMES, VALID_NAMES},
    splitter::split_by_valid_portion,
};

#[derive(Debug, Clone)]
pub struct PrepConfig {
    pub raw_data_path: PathBuf,
    pub valid_portion: u32,
}

/// Sizes of the written lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepSummary {
    pub train: usize,
    pub valid: usize,
}

pub struct PrepUseCase {
    config: PrepConfig,
}

impl PrepUseCase {
    pub fn new(config: PrepConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<PrepSummary> {
        self.execute_with_rng(&mut rand::thread_rng())
    }

    pub fn execute_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PrepSummary> {
        let cfg = &self.config;

        let alpha_dir = cfg.raw_data_path.join(ALPHA_DIR);
        let names = list_images(&alpha_dir)?;
        ensure!(!names.is_empty(), "no images found in '{}'", alpha_dir.display());
        tracing::info!("Found {} mattes in '{}'", names.len(), alpha_dir.display());

        let (train, valid) = split_by_valid_portion(names, cfg.valid_portion, rng)?;

        write_name_list(&cfg.raw_data_path.join(TRAIN_NAMES), &train)?;
        write_name_list(&cfg.raw_data_path.join(VALID_NAMES), &valid)?;
        tracing::info!(
            "Wrote {} training and {} validation names ({}% valid)",
            train.len(),
            valid.len(),
            cfg.valid_portion
        );

        Ok(PrepSummary { train: train.len(), valid: valid.len() })
    }
}
