// ============================================================
// Layer 6 - Checkpoint Writer / Reader
// ============================================================
// Persists the training state needed to resume a run.
//
// What gets saved per checkpoint (one JSON document):
//   epoch, model, optimizer, cur_iter, max_iter, best_loss, init_lr
//
// The model and optimizer entries are whatever serialisable state
// the caller hands in (e.g. a burn record item); this module never
// looks inside them.
//
// File naming convention:
//   <ckpt_path>ckpt_<epoch:03>_<loss:.4>.tar        ← always
//   <ckpt_path>ckpt_<epoch:03>_<loss:.4>_best.tar   ← best so far
//
// Writing the same epoch and loss twice overwrites silently.
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json documentation

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Everything needed to resume training from the end of an epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointState<M, O> {
    pub epoch:     usize,
    pub model:     M,
    pub optimizer: O,
    pub cur_iter:  usize,
    pub max_iter:  usize,
    pub best_loss: f64,
    pub init_lr:   f64,
}

/// `ckpt_<epoch:03>_<loss:.4>.tar`, or the `_best` variant.
pub fn checkpoint_filename(epoch: usize, loss: f64, best: bool) -> String {
    if best {
        format!("ckpt_{epoch:03}_{loss:.4}_best.tar")
    } else {
        format!("ckpt_{epoch:03}_{loss:.4}.tar")
    }
}

impl<M: Serialize, O: Serialize> CheckpointState<M, O> {
    /// Serialise once and write the regular file, plus the `_best`
    /// copy with identical bytes when one is requested.
    fn write(&self, path: &Path, best_path: Option<&Path>) -> Result<()> {
        let bytes = serde_json::to_vec(self).context("Failed to serialise checkpoint")?;

        fs::write(path, &bytes)
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;
        tracing::debug!("Saved checkpoint '{}'", path.display());

        if let Some(best_path) = best_path {
            fs::write(best_path, &bytes).with_context(|| {
                format!("Failed to save best checkpoint to '{}'", best_path.display())
            })?;
            tracing::debug!("Saved best checkpoint '{}'", best_path.display());
        }
        Ok(())
    }
}

/// Save a training checkpoint.
///
/// `ckpt_path` is a prefix that is concatenated with the file name,
/// so it normally ends in a path separator. `loss` is stored as the
/// record's `best_loss`.
#[allow(clippy::too_many_arguments)]
pub fn save_checkpoint<M: Serialize, O: Serialize>(
    epoch:     usize,
    model:     &M,
    optimizer: &O,
    cur_iter:  usize,
    max_iter:  usize,
    init_lr:   f64,
    loss:      f64,
    is_best:   bool,
    ckpt_path: &str,
) -> Result<()> {
    let state = CheckpointState {
        epoch,
        model,
        optimizer,
        cur_iter,
        max_iter,
        best_loss: loss,
        init_lr,
    };

    let path = PathBuf::from(format!("{ckpt_path}{}", checkpoint_filename(epoch, loss, false)));
    let best = is_best
        .then(|| PathBuf::from(format!("{ckpt_path}{}", checkpoint_filename(epoch, loss, true))));
    state.write(&path, best.as_deref())
}

/// Read a checkpoint written by [`save_checkpoint`].
pub fn load_checkpoint<M: DeserializeOwned, O: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<CheckpointState<M, O>> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read checkpoint '{}'", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("'{}' is not a valid checkpoint", path.display()))
}

/// Manages the checkpoints of one run inside a directory.
pub struct CheckpointManager {
    /// Path to the directory where checkpoints are stored
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a manager for `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `state` into the managed directory, named after its
    /// epoch and `best_loss`.
    pub fn save<M: Serialize, O: Serialize>(
        &self,
        state:   &CheckpointState<M, O>,
        is_best: bool,
    ) -> Result<PathBuf> {
        let path = self.dir.join(checkpoint_filename(state.epoch, state.best_loss, false));
        let best = is_best
            .then(|| self.dir.join(checkpoint_filename(state.epoch, state.best_loss, true)));
        state.write(&path, best.as_deref())?;
        Ok(path)
    }

    /// Path of the newest regular (non-`_best`) checkpoint, by epoch.
    /// When several files share that epoch the lexically last wins.
    pub fn latest_path(&self) -> Result<Option<PathBuf>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot list '{}'", self.dir.display()))?;

        let mut newest: Option<(usize, PathBuf)> = None;
        for entry in entries {
            let path = entry?.path();
            let Some(epoch) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_epoch)
            else {
                continue;
            };
            let replace = match &newest {
                Some((best_epoch, best_path)) => {
                    epoch > *best_epoch || (epoch == *best_epoch && path > *best_path)
                }
                None => true,
            };
            if replace {
                newest = Some((epoch, path));
            }
        }
        Ok(newest.map(|(_, path)| path))
    }

    /// Load the newest regular checkpoint, if the directory holds one.
    pub fn latest<M: DeserializeOwned, O: DeserializeOwned>(
        &self,
    ) -> Result<Option<(PathBuf, CheckpointState<M, O>)>> {
        match self.latest_path()? {
            Some(path) => {
                tracing::info!("Loading checkpoint '{}'", path.display());
                let state = load_checkpoint(&path)?;
                Ok(Some((path, state)))
            }
            None => Ok(None),
        }
    }
}

/// Epoch of a regular checkpoint file name, `None` for anything else
/// (including `_best` copies).
fn parse_epoch(file_name: &str) -> Option<usize> {
    let stem = file_name.strip_prefix("ckpt_")?.strip_suffix(".tar")?;
    if stem.ends_with("_best") {
        return None;
    }
    let (epoch, loss) = stem.split_once('_')?;
    loss.parse::<f64>().ok()?;
    epoch.parse().ok()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn prefix(dir: &tempfile::TempDir) -> String {
        format!("{}/", dir.path().display())
    }

    #[test]
    fn test_filename_format() {
        assert_eq!(checkpoint_filename(5, 0.1234, false), "ckpt_005_0.1234.tar");
        assert_eq!(checkpoint_filename(5, 0.1234, true), "ckpt_005_0.1234_best.tar");
        assert_eq!(checkpoint_filename(120, 0.5, false), "ckpt_120_0.5000.tar");
    }

    #[test]
    fn test_save_writes_regular_and_best_copies() {
        let dir = tempfile::tempdir().unwrap();
        let model = json!({"encoder.weight": [0.1, 0.2]});
        let optimizer = json!({"step": 40});

        save_checkpoint(5, &model, &optimizer, 40, 400, 0.001, 0.1234, true, &prefix(&dir))
            .unwrap();

        let regular = dir.path().join("ckpt_005_0.1234.tar");
        let best = dir.path().join("ckpt_005_0.1234_best.tar");
        assert!(regular.exists());
        assert!(best.exists());
        assert_eq!(fs::read(&regular).unwrap(), fs::read(&best).unwrap());

        let state: CheckpointState<Value, Value> = load_checkpoint(&best).unwrap();
        assert_eq!(state.epoch, 5);
        assert_eq!(state.model, model);
        assert_eq!(state.optimizer, optimizer);
        assert_eq!(state.cur_iter, 40);
        assert_eq!(state.max_iter, 400);
        assert_eq!(state.best_loss, 0.1234);
        assert_eq!(state.init_lr, 0.001);
    }

    #[test]
    fn test_record_has_exactly_seven_keys() {
        let dir = tempfile::tempdir().unwrap();
        save_checkpoint(1, &json!(null), &json!(null), 0, 10, 0.01, 2.0, false, &prefix(&dir))
            .unwrap();

        let raw: Value =
            serde_json::from_slice(&fs::read(dir.path().join("ckpt_001_2.0000.tar")).unwrap())
                .unwrap();
        let mut keys: Vec<&str> = raw.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["best_loss", "cur_iter", "epoch", "init_lr", "max_iter", "model", "optimizer"]
        );
    }

    #[test]
    fn test_no_best_copy_unless_requested() {
        let dir = tempfile::tempdir().unwrap();
        save_checkpoint(2, &1u8, &2u8, 0, 10, 0.01, 0.5, false, &prefix(&dir)).unwrap();
        assert!(dir.path().join("ckpt_002_0.5000.tar").exists());
        assert!(!dir.path().join("ckpt_002_0.5000_best.tar").exists());
    }

    #[test]
    fn test_missing_directory_propagates_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = format!("{}/does/not/exist/", dir.path().display());
        assert!(save_checkpoint(0, &0u8, &0u8, 0, 1, 0.1, 1.0, false, &missing).is_err());
    }

    #[test]
    fn test_manager_finds_latest_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path().join("run")).unwrap();
        assert!(manager.latest_path().unwrap().is_none());

        for (epoch, loss, best) in [(9, 0.30, true), (19, 0.25, true), (29, 0.27, false)] {
            let state = CheckpointState {
                epoch,
                model: json!({}),
                optimizer: json!({}),
                cur_iter: epoch * 10,
                max_iter: 1000,
                best_loss: loss,
                init_lr: 0.001,
            };
            manager.save(&state, best).unwrap();
        }
        fs::write(manager.dir().join("notes.txt"), "ignored").unwrap();

        let (path, state) = manager.latest::<Value, Value>().unwrap().unwrap();
        assert_eq!(path.file_name().unwrap(), "ckpt_029_0.2700.tar");
        assert_eq!(state.epoch, 29);
        assert_eq!(state.cur_iter, 290);
    }

    #[test]
    fn test_parse_epoch() {
        assert_eq!(parse_epoch("ckpt_005_0.1234.tar"), Some(5));
        assert_eq!(parse_epoch("ckpt_005_0.1234_best.tar"), None);
        assert_eq!(parse_epoch("ckpt_abc_0.1.tar"), None);
        assert_eq!(parse_epoch("model_epoch_3.mpk.gz"), None);
    }
}
