// ============================================================
// Layer 4 - Sample Name Lists
// ============================================================
// The dataset is addressed by file name. The same name is looked
// up under alpha/, trimap/ and pred/, and the train / valid
// splits are stored as plain text lists, one name per line:
//
//   <raw_data_path>/train_names.txt
//   <raw_data_path>/valid_names.txt
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Sample names used for training, one per line, under the data root.
pub const TRAIN_NAMES: &str = "train_names.txt";

/// Sample names held out for validation / testing.
pub const VALID_NAMES: &str = "valid_names.txt";

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// File names of every image directly inside `dir`, sorted.
pub fn list_images(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
    {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if !is_image || !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Read a name list, skipping blank lines.
pub fn read_name_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read name list '{}'", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Write `names` one per line, replacing any existing file.
pub fn write_name_list(path: &Path, names: &[String]) -> Result<()> {
    let mut text = names.join("\n");
    if !names.is_empty() {
        text.push('\n');
    }
    fs::write(path, text).with_context(|| format!("Cannot write name list '{}'", path.display()))
}
