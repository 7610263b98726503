// ============================================================
// Layer 4 - Matte Loader
// ============================================================
// Loads evaluation triples from a data root laid out as:
//
//   <root>/
//     pred/     predicted alpha mattes (grayscale images)
//     alpha/    ground-truth alpha mattes
//     trimap/   trimaps with 0 / 128 / 255 values
//     valid_names.txt   (optional) which files to evaluate
//
// The same file name is looked up in all three folders. Mattes
// are scaled from 0..255 to 0..1; trimaps keep their raw values.
//
// Reference: image crate documentation
//            Burn Book §3 (Tensors)

use anyhow::{bail, Context, Result};
use burn::prelude::*;
use image::GrayImage;
use std::path::{Path, PathBuf};

use crate::data::names::{list_images, read_name_list, VALID_NAMES};
use crate::domain::sample::MattePrediction;
use crate::domain::traits::MatteSource;
use crate::domain::trimap::unknown_pixel_count;

pub const PRED_DIR: &str = "pred";
pub const ALPHA_DIR: &str = "alpha";
pub const TRIMAP_DIR: &str = "trimap";

/// Reads matte triples from a data root directory.
/// Implements the MatteSource trait from Layer 3.
pub struct MatteDirectory {
    root: PathBuf,
}

impl MatteDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl<B: Backend> MatteSource<B> for MatteDirectory {
    /// Names from `valid_names.txt` when present, otherwise every
    /// image in `pred/`.
    fn names(&self) -> Result<Vec<String>> {
        let list = self.root.join(VALID_NAMES);
        if list.exists() {
            tracing::info!("Evaluating names listed in '{}'", list.display());
            read_name_list(&list)
        } else {
            list_images(&self.root.join(PRED_DIR))
        }
    }

    fn load(&self, name: &str, device: &B::Device) -> Result<MattePrediction<B>> {
        let pred = open_gray(&self.root.join(PRED_DIR).join(name))?;
        let alpha = open_gray(&self.root.join(ALPHA_DIR).join(name))?;
        let trimap = open_gray(&self.root.join(TRIMAP_DIR).join(name))?;

        let dims = pred.dimensions();
        for (kind, img) in [("alpha", &alpha), ("trimap", &trimap)] {
            if img.dimensions() != dims {
                bail!(
                    "{name}: {kind} is {}x{}, prediction is {}x{}",
                    img.width(),
                    img.height(),
                    dims.0,
                    dims.1
                );
            }
        }

        if unknown_pixel_count(trimap.as_raw()) == 0 {
            tracing::warn!("{name}: trimap has no unknown-region pixels");
        }

        Ok(MattePrediction::new(
            name,
            to_tensor(pred, 1.0 / 255.0, device),
            to_tensor(alpha, 1.0 / 255.0, device),
            to_tensor(trimap, 1.0, device),
        ))
    }
}

fn open_gray(path: &Path) -> Result<GrayImage> {
    Ok(image::open(path)
        .with_context(|| format!("failed to open image '{}'", path.display()))?
        .to_luma8())
}

/// `[height, width]` tensor of `img`'s pixels multiplied by `scale`.
fn to_tensor<B: Backend>(img: GrayImage, scale: f32, device: &B::Device) -> Tensor<B, 2> {
    let (width, height) = img.dimensions();
    let values: Vec<f32> = img.into_raw().into_iter().map(|v| v as f32 * scale).collect();
    Tensor::from_data(TensorData::new(values, [height as usize, width as usize]), device)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use image::Luma;
    use std::fs;

    type TestBackend = NdArray;

    fn write_gray(path: &Path, w: u32, h: u32, f: impl Fn(u32, u32) -> u8) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        GrayImage::from_fn(w, h, |x, y| Luma([f(x, y)])).save(path).unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_gray(&root.join("pred/a.png"), 4, 2, |_, _| 255);
        write_gray(&root.join("alpha/a.png"), 4, 2, |x, _| if x < 2 { 255 } else { 0 });
        write_gray(&root.join("trimap/a.png"), 4, 2, |x, _| if x == 1 { 128 } else { 0 });
        write_gray(&root.join("pred/b.png"), 4, 2, |_, _| 0);
        dir
    }

    #[test]
    fn test_names_fall_back_to_pred_folder() {
        let dir = fixture();
        let source = MatteDirectory::new(dir.path());
        let names = <MatteDirectory as MatteSource<TestBackend>>::names(&source).unwrap();
        assert_eq!(names, ["a.png", "b.png"]);
    }

    #[test]
    fn test_names_prefer_valid_list() {
        let dir = fixture();
        fs::write(dir.path().join(VALID_NAMES), "a.png\n").unwrap();
        let source = MatteDirectory::new(dir.path());
        let names = <MatteDirectory as MatteSource<TestBackend>>::names(&source).unwrap();
        assert_eq!(names, ["a.png"]);
    }

    #[test]
    fn test_load_scales_mattes_not_trimap() {
        let dir = fixture();
        let source = MatteDirectory::new(dir.path());
        let device = <TestBackend as Backend>::Device::default();
        let sample: MattePrediction<TestBackend> = source.load("a.png", &device).unwrap();

        assert_eq!(sample.dims(), [2, 4]);
        let pred: Vec<f32> = sample.pred.into_data().to_vec().unwrap();
        assert!(pred.iter().all(|&v| (v - 1.0).abs() < 1e-6));
        let trimap: Vec<f32> = sample.trimap.into_data().to_vec().unwrap();
        assert_eq!(trimap, [0.0, 128.0, 0.0, 0.0, 0.0, 128.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_ground_truth_is_an_error() {
        let dir = fixture();
        let source = MatteDirectory::new(dir.path());
        let device = <TestBackend as Backend>::Device::default();
        let result: Result<MattePrediction<TestBackend>> = source.load("b.png", &device);
        assert!(result.is_err());
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let dir = fixture();
        write_gray(&dir.path().join("alpha/b.png"), 3, 2, |_, _| 0);
        write_gray(&dir.path().join("trimap/b.png"), 4, 2, |_, _| 128);
        let source = MatteDirectory::new(dir.path());
        let device = <TestBackend as Backend>::Device::default();
        let result: Result<MattePrediction<TestBackend>> = source.load("b.png", &device);
        assert!(result.is_err());
    }
}
