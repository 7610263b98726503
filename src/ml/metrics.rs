// ============================================================
// Layer 5 - Matting Error Metrics
// ============================================================
// The two numbers reported for every evaluated matte:
//
//   MSE - squared error summed over the image, divided by the
//         number of pixels in the trimap's unknown band (128)
//   SAD - absolute error summed over the image, divided by 1000
//
// Both take burn tensors of any rank so the same functions work
// on a single [H, W] matte and on a whole [N, 1, H, W] batch.
//
// Reference: Rhemann et al. (2009) alphamatting.com benchmark

use anyhow::{ensure, Result};
use burn::prelude::*;

use crate::domain::trimap::UNKNOWN;

/// Mean squared error of `pred` against `alpha`, normalised by the
/// size of the trimap's unknown region.
///
/// The squared error is summed over every element, not only over the
/// unknown band. Fails when the shapes disagree or when no trimap
/// pixel equals 128.
pub fn compute_mse<B: Backend, const D: usize>(
    pred:   Tensor<B, D>,
    alpha:  Tensor<B, D>,
    trimap: Tensor<B, D>,
) -> Result<f64> {
    ensure!(
        pred.dims() == alpha.dims(),
        "prediction shape {:?} does not match ground truth {:?}",
        pred.dims(),
        alpha.dims()
    );
    ensure!(
        trimap.dims() == pred.dims(),
        "trimap shape {:?} does not match prediction {:?}",
        trimap.dims(),
        pred.dims()
    );

    let unknown: i64 = trimap
        .equal_elem(f32::from(UNKNOWN))
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    ensure!(
        unknown > 0,
        "trimap has no unknown-region pixels (value {UNKNOWN}); MSE is undefined"
    );

    let squared: f64 = (pred - alpha)
        .powf_scalar(2.0)
        .sum()
        .into_scalar()
        .elem::<f64>();

    Ok(squared / unknown as f64)
}

/// Sum of absolute differences between `pred` and `alpha`, divided by 1000.
pub fn compute_sad<B: Backend, const D: usize>(
    pred:  Tensor<B, D>,
    alpha: Tensor<B, D>,
) -> Result<f64> {
    ensure!(
        pred.dims() == alpha.dims(),
        "prediction shape {:?} does not match ground truth {:?}",
        pred.dims(),
        alpha.dims()
    );

    let abs_sum: f64 = (pred - alpha).abs().sum().into_scalar().elem::<f64>();
    Ok(abs_sum / 1000.0)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn device() -> <TestBackend as Backend>::Device {
        Default::default()
    }

    fn matte(values: [[f32; 3]; 2]) -> Tensor<TestBackend, 2> {
        Tensor::from_floats(values, &device())
    }

    #[test]
    fn test_mse_zero_for_perfect_prediction() {
        let alpha = matte([[0.0, 0.5, 1.0], [0.25, 0.75, 1.0]]);
        let trimap = matte([[0.0, 128.0, 255.0], [128.0, 128.0, 255.0]]);
        let mse = compute_mse(alpha.clone(), alpha, trimap).unwrap();
        assert_eq!(mse, 0.0);
    }

    #[test]
    fn test_mse_normalised_by_unknown_count() {
        let pred = matte([[0.5, 0.5, 1.0], [0.0, 0.0, 0.0]]);
        let alpha = matte([[0.0, 0.0, 1.0], [0.0, 0.0, 0.0]]);
        // Two unknown pixels, squared error 0.25 + 0.25 summed over the whole image.
        let trimap = matte([[128.0, 0.0, 255.0], [128.0, 0.0, 0.0]]);
        let mse = compute_mse(pred, alpha, trimap).unwrap();
        assert!((mse - 0.25).abs() < 1e-6, "mse = {mse}");
    }

    #[test]
    fn test_mse_errors_without_unknown_region() {
        let alpha = matte([[0.0, 0.5, 1.0], [0.25, 0.75, 1.0]]);
        let trimap = matte([[0.0, 0.0, 255.0], [255.0, 127.0, 129.0]]);
        assert!(compute_mse(alpha.clone(), alpha, trimap).is_err());
    }

    #[test]
    fn test_mse_rejects_shape_mismatch() {
        let pred = Tensor::<TestBackend, 2>::zeros([2, 2], &device());
        let alpha = Tensor::<TestBackend, 2>::zeros([2, 3], &device());
        let trimap = Tensor::<TestBackend, 2>::full([2, 3], 128.0, &device());
        assert!(compute_mse(pred, alpha, trimap).is_err());
    }

    #[test]
    fn test_sad_zero_for_perfect_prediction() {
        let alpha = Tensor::<TestBackend, 4>::ones([2, 1, 4, 4], &device()) * 0.3;
        assert_eq!(compute_sad(alpha.clone(), alpha).unwrap(), 0.0);
    }

    #[test]
    fn test_sad_value() {
        let pred = Tensor::<TestBackend, 2>::ones([10, 100], &device());
        let alpha = Tensor::<TestBackend, 2>::zeros([10, 100], &device());
        // 1000 pixels off by 1.0 each
        let sad = compute_sad(pred, alpha).unwrap();
        assert!((sad - 1.0).abs() < 1e-6, "sad = {sad}");
    }

    #[test]
    fn test_sad_scales_with_difference() {
        let pred = matte([[0.5, 0.2, 0.9], [0.1, 0.0, 0.4]]);
        let alpha = matte([[0.3, 0.2, 0.7], [0.6, 0.1, 0.4]]);
        let base = compute_sad(pred.clone(), alpha.clone()).unwrap();

        let k = -3.0;
        let scaled = alpha.clone() + (pred - alpha.clone()) * k;
        let sad = compute_sad(scaled, alpha).unwrap();
        assert!((sad - base * 3.0).abs() < 1e-6, "{sad} vs {}", base * 3.0);
    }
}
