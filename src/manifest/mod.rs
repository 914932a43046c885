//! YOLO `data.yaml` manifest generation.
//!
//! The manifest names the dataset root, the image directory of each split
//! relative to it, and the class id → name table:
//!
//! ```yaml
//! path: dataset
//! train: images/train
//! test: images/test
//! val: images/val
//! names:
//!   0: person
//!   1: bicycle
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::DatasetError;
use crate::split::Split;

/// Where the manifest goes when no path is given.
pub const DEFAULT_MANIFEST_PATH: &str = "data.yaml";

/// Contents of a dataset manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Dataset root, as given by the caller.
    pub path: String,
    /// Train images, relative to `path`.
    pub train: String,
    /// Test images, relative to `path`.
    pub test: String,
    /// Validation images, relative to `path`.
    pub val: String,
    /// Class id → class name.
    pub names: BTreeMap<usize, String>,
}

impl Manifest {
    /// Build the manifest for `dataset_root`; ids are positions in `classes`.
    pub fn new(dataset_root: &Path, classes: &[String]) -> Self {
        let split_dir = |split: Split| format!("images/{split}");

        Self {
            path: dataset_root.display().to_string(),
            train: split_dir(Split::Train),
            test: split_dir(Split::Test),
            val: split_dir(Split::Val),
            names: classes.iter().cloned().enumerate().collect(),
        }
    }
}

/// What [`write_manifest_to`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestOutcome {
    Written(PathBuf),
    /// A file was already there and was left untouched.
    Skipped(PathBuf),
}

/// Write the manifest to [`DEFAULT_MANIFEST_PATH`] in the working directory.
pub fn write_manifest(
    dataset_root: &Path,
    classes: &[String],
) -> Result<ManifestOutcome, DatasetError> {
    write_manifest_to(Path::new(DEFAULT_MANIFEST_PATH), dataset_root, classes)
}

/// Write the manifest to `manifest_path` unless a file already exists there.
pub fn write_manifest_to(
    manifest_path: &Path,
    dataset_root: &Path,
    classes: &[String],
) -> Result<ManifestOutcome, DatasetError> {
    if manifest_path.exists() {
        warn!(
            "{} already exists. Skipping creation",
            manifest_path.display()
        );
        return Ok(ManifestOutcome::Skipped(manifest_path.to_path_buf()));
    }

    let manifest = Manifest::new(dataset_root, classes);
    let yaml = serde_yaml::to_string(&manifest).map_err(|source| {
        DatasetError::ManifestSerialize {
            path: manifest_path.to_path_buf(),
            source,
        }
        .logged()
    })?;

    fs::write(manifest_path, yaml).map_err(|source| DatasetError::io(manifest_path, source))?;

    info!("Successfully created {}", manifest_path.display());
    Ok(ManifestOutcome::Written(manifest_path.to_path_buf()))
}
