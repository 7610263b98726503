// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses the command line with `clap` and routes to Layer 2.
//
//   --mode=prep   split <raw>/alpha into train / valid name lists
//   --mode=test   score <raw>/pred against <raw>/alpha
//   --mode=train  size, resume and log the LR schedule of a run
//
// Flags keep their snake_case spelling (--valid_portion, not
// --valid-portion).
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{Context, Result};
use burn::backend::{wgpu::WgpuDevice, NdArray, Wgpu};
use clap::Parser;
use std::path::PathBuf;

use crate::application::{
    prep_use_case::PrepUseCase, test_use_case::TestUseCase, train_use_case::TrainUseCase,
};
use crate::infra::logger::Logger;
pub use commands::Mode;

#[derive(Parser, Debug)]
#[command(
    name = "ada-matting",
    version,
    about = "Dataset preparation, evaluation and LR scheduling for AdaMatting."
)]
pub struct Cli {
    /// train, test or prep
    #[arg(long, value_enum)]
    pub mode: Mode,

    /// Percentage of the dataset held out for validation (0-100)
    #[arg(long = "valid_portion", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub valid_portion: u32,

    #[arg(long = "batch_size", default_value_t = 64)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// Initial learning rate of the poly schedule
    #[arg(long, default_value_t = 0.001)]
    pub lr: f64,

    /// Run tensor work on the GPU
    #[arg(long)]
    pub cuda: bool,

    /// Comma-separated GPU ids; the first one is used
    #[arg(long, default_value = "0")]
    pub gpu: String,

    /// Also append log lines to log.txt
    #[arg(long = "write_log")]
    pub write_log: bool,

    #[arg(long = "raw_data_path", default_value = "/data/datasets/im/AdaMatting/")]
    pub raw_data_path: PathBuf,

    /// Checkpoint directory
    #[arg(long = "ckpt_path")]
    pub ckpt_path: Option<String>,

    #[arg(long = "save_ckpt")]
    pub save_ckpt: bool,

    /// Continue from the newest checkpoint in --ckpt_path
    #[arg(long)]
    pub resume: bool,
}

impl Cli {
    /// Dispatch to the use case for `--mode`.
    pub fn run(self, logger: &Logger) -> Result<()> {
        tracing::info!("{} | {:?}", logger.name(), self);

        match self.mode {
            Mode::Prep => {
                let summary = PrepUseCase::new((&self).into()).execute()?;
                println!("Prepared {} training / {} validation names.", summary.train, summary.valid);
            }
            Mode::Test => {
                let summary = if self.cuda {
                    let device = WgpuDevice::DiscreteGpu(self.gpu_index()?);
                    TestUseCase::<Wgpu>::new((&self).into(), device).execute()?
                } else {
                    TestUseCase::<NdArray>::new((&self).into(), Default::default()).execute()?
                };
                println!(
                    "Evaluated {} images: MSE={:.6} SAD={:.4}",
                    summary.images, summary.mse, summary.sad
                );
            }
            Mode::Train => {
                let session = TrainUseCase::new((&self).into()).execute()?;
                println!(
                    "Schedule ready: epoch {} of {}, iteration {} of {}.",
                    session.start_epoch(),
                    self.epochs,
                    session.cur_iter(),
                    session.schedule().max_iter
                );
            }
        }
        Ok(())
    }

    /// First entry of `--gpu`.
    fn gpu_index(&self) -> Result<usize> {
        let first = self.gpu.split(',').next().unwrap_or_default().trim();
        first
            .parse()
            .with_context(|| format!("invalid --gpu value '{}'", self.gpu))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ada-matting", "--mode=train", "--valid_portion=20"]).unwrap();
        assert_eq!(cli.mode, Mode::Train);
        assert_eq!(cli.valid_portion, 20);
        assert_eq!(cli.batch_size, 64);
        assert_eq!(cli.epochs, 20);
        assert_eq!(cli.lr, 0.001);
        assert_eq!(cli.gpu, "0");
        assert_eq!(cli.raw_data_path, PathBuf::from("/data/datasets/im/AdaMatting/"));
        assert!(!cli.cuda && !cli.write_log && !cli.save_ckpt && !cli.resume);
        assert!(cli.ckpt_path.is_none());
    }

    #[test]
    fn test_invalid_mode_rejected() {
        assert!(Cli::try_parse_from(["ada-matting", "--mode=invalid", "--valid_portion=20"]).is_err());
    }

    #[test]
    fn test_required_flags() {
        assert!(Cli::try_parse_from(["ada-matting", "--mode=prep"]).is_err());
        assert!(Cli::try_parse_from(["ada-matting", "--valid_portion=20"]).is_err());
    }

    #[test]
    fn test_valid_portion_range() {
        assert!(Cli::try_parse_from(["ada-matting", "--mode=prep", "--valid_portion=101"]).is_err());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "ada-matting",
            "--mode=test",
            "--valid_portion=5",
            "--batch_size=8",
            "--epochs=3",
            "--lr=0.01",
            "--cuda",
            "--gpu=2,3",
            "--write_log",
            "--raw_data_path=/tmp/data",
            "--ckpt_path=/tmp/ckpt/",
            "--save_ckpt",
            "--resume",
        ])
        .unwrap();
        assert_eq!(cli.mode, Mode::Test);
        assert_eq!(cli.batch_size, 8);
        assert_eq!(cli.epochs, 3);
        assert_eq!(cli.lr, 0.01);
        assert_eq!(cli.gpu_index().unwrap(), 2);
        assert_eq!(cli.ckpt_path.as_deref(), Some("/tmp/ckpt/"));
        assert!(cli.cuda && cli.write_log && cli.save_ckpt && cli.resume);
    }

    #[test]
    fn test_bad_gpu_index() {
        let cli = Cli::try_parse_from(["ada-matting", "--mode=test", "--valid_portion=0", "--gpu=x"])
            .unwrap();
        assert!(cli.gpu_index().is_err());
    }
}
