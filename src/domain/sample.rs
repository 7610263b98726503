// ============================================================
// Layer 3 - Evaluation Sample
// ============================================================
// One image as the test mode sees it: a prediction, its ground
// truth and the trimap, already on the chosen burn device.

use burn::prelude::*;

/// One evaluated image: the network's matte, the ground-truth matte
/// and the trimap it was predicted from.
///
/// All three tensors are `[height, width]`. `pred` and `alpha` hold
/// opacities in `[0, 1]`; `trimap` keeps its raw 0 / 128 / 255 values
/// so the unknown band can be selected by exact comparison.
#[derive(Debug, Clone)]
pub struct MattePrediction<B: Backend> {
    pub name:   String,
    pub pred:   Tensor<B, 2>,
    pub alpha:  Tensor<B, 2>,
    pub trimap: Tensor<B, 2>,
}

impl<B: Backend> MattePrediction<B> {
    pub fn new(
        name:   impl Into<String>,
        pred:   Tensor<B, 2>,
        alpha:  Tensor<B, 2>,
        trimap: Tensor<B, 2>,
    ) -> Self {
        Self { name: name.into(), pred, alpha, trimap }
    }

    /// `[height, width]` of the prediction.
    pub fn dims(&self) -> [usize; 2] {
        self.pred.dims()
    }
}
