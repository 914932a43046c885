//! Dataset directory tree creation.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::DatasetError;
use crate::split::Split;

/// Top-level sub-trees of a YOLO dataset.
pub const SUB_PATHS: [&str; 2] = ["images", "labels"];

/// Create `<root>/<sub_path>/<split>` for every combination.
///
/// Directories that already exist are left alone and reported with a
/// warning, so calling this twice on the same root is harmless.
pub fn create_paths(
    dataset_root: &Path,
    sub_paths: &[&str],
    splits: &[Split],
) -> Result<(), DatasetError> {
    for sub_path in sub_paths {
        for split in splits {
            let dir = dataset_root.join(sub_path).join(split.as_str());
            if dir.exists() {
                warn!(
                    "Directory '{}' already exists, skipping creation",
                    dir.display()
                );
                continue;
            }

            fs::create_dir_all(&dir).map_err(|source| DatasetError::io(&dir, source))?;
            info!("Created directory: '{}'", dir.display());
        }
    }

    Ok(())
}

/// [`create_paths`] with the standard `images`/`labels` × train/test/val tree.
pub fn create_dataset_paths(dataset_root: &Path) -> Result<(), DatasetError> {
    create_paths(dataset_root, &SUB_PATHS, &Split::ALL)
}
