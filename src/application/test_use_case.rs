// ============================================================
// Layer 2 - TestUseCase
// ============================================================
// Scores saved predictions against ground truth:
//
//   Step 1: Collect sample names     (Layer 4 - data)
//   Step 2: Load pred/alpha/trimap   (Layer 4 - data)
//   Step 3: MSE and SAD per image    (Layer 5 - ml)
//   Step 4: Running averages         (Layer 5 - ml)
//   Step 5: Per-image CSV rows       (Layer 6 - infra)

use anyhow::{ensure, Result};
use burn::prelude::*;
use std::path::PathBuf;

use crate::data::loader::MatteDirectory;
use crate::domain::traits::MatteSource;
use crate::infra::metrics_log::{EvalRecord, MetricsLogger};
use crate::ml::{
    meter::AverageMeter,
    metrics::{compute_mse, compute_sad},
};

#[derive(Debug, Clone)]
pub struct TestConfig {
    pub raw_data_path: PathBuf,
}

/// Averages over the evaluated images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalSummary {
    pub images: usize,
    pub mse:    f64,
    pub sad:    f64,
}

pub struct TestUseCase<B: Backend> {
    config: TestConfig,
    device: B::Device,
}

impl<B: Backend> TestUseCase<B> {
    pub fn new(config: TestConfig, device: B::Device) -> Self {
        Self { config, device }
    }

    pub fn execute(&self) -> Result<EvalSummary> {
        let source = MatteDirectory::new(&self.config.raw_data_path);
        let metrics = MetricsLogger::new(&self.config.raw_data_path)?;
        evaluate::<B, _>(&source, &self.device, &metrics)
    }
}

/// Score every sample of `source`, appending one CSV row each.
///
/// An image whose trimap has no unknown band still counts towards
/// SAD; its MSE is logged as NaN and left out of the MSE average.
pub fn evaluate<B: Backend, S: MatteSource<B>>(
    source:  &S,
    device:  &B::Device,
    metrics: &MetricsLogger,
) -> Result<EvalSummary> {
    let names = source.names()?;
    ensure!(!names.is_empty(), "nothing to evaluate");
    tracing::info!("Evaluating {} images", names.len());

    let mut mse_meter = AverageMeter::new();
    let mut sad_meter = AverageMeter::new();

    for name in &names {
        let sample = source.load(name, device)?;

        let sad = compute_sad(sample.pred.clone(), sample.alpha.clone())?;
        sad_meter.update(sad);

        let mse = match compute_mse(sample.pred, sample.alpha, sample.trimap) {
            Ok(mse) => {
                mse_meter.update(mse);
                mse
            }
            Err(err) => {
                tracing::warn!("{name}: {err:#}");
                f64::NAN
            }
        };

        tracing::info!(
            "{name}: mse={:.6} (avg {:.6}) | sad={:.4} (avg {:.4})",
            mse,
            mse_meter.avg(),
            sad,
            sad_meter.avg(),
        );
        metrics.log(&EvalRecord::new(name.as_str(), mse, sad))?;
    }

    let summary = EvalSummary {
        images: sad_meter.count(),
        mse:    mse_meter.avg(),
        sad:    sad_meter.avg(),
    };
    tracing::info!(
        "Test finished: {} images | MSE={:.6} | SAD={:.4} | results in '{}'",
        summary.images,
        summary.mse,
        summary.sad,
        metrics.csv_path().display(),
    );
    Ok(summary)
}
