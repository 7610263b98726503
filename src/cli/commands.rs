// ============================================================
// Layer 1 - CLI Modes and Conversions
// ============================================================
// The three values of --mode, and the conversions from parsed
// flags into each use case's config.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::ValueEnum;
use std::path::PathBuf;

use super::Cli;
use crate::application::{
    prep_use_case::PrepConfig, test_use_case::TestConfig, train_use_case::TrainConfig,
};

/// What the binary does with the dataset under --raw_data_path.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plan or resume a training run
    Train,
    /// Score saved predictions against ground truth
    Test,
    /// Split the dataset into train / validation name lists
    Prep,
}

impl From<&Cli> for PrepConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            raw_data_path: cli.raw_data_path.clone(),
            valid_portion: cli.valid_portion,
        }
    }
}

impl From<&Cli> for TestConfig {
    fn from(cli: &Cli) -> Self {
        Self { raw_data_path: cli.raw_data_path.clone() }
    }
}

impl From<&Cli> for TrainConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            raw_data_path: cli.raw_data_path.clone(),
            batch_size:    cli.batch_size,
            epochs:        cli.epochs,
            lr:            cli.lr,
            ckpt_path:     cli.ckpt_path.as_ref().map(PathBuf::from),
            save_ckpt:     cli.save_ckpt,
            resume:        cli.resume,
        }
    }
}
