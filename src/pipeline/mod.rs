//! End-to-end dataset creation.

use std::path::PathBuf;

use tracing::info;

use crate::classes::read_classes;
use crate::copy::copy_contents;
use crate::error::DatasetError;
use crate::layout::create_dataset_paths;
use crate::manifest::{write_manifest_to, ManifestOutcome, DEFAULT_MANIFEST_PATH};
use crate::split::{split_images, DiscoveryOrder, SplitOptions, SplitRatios, DEFAULT_SEED};

/// Inputs for [`create_dataset`].
#[derive(Clone, Debug)]
pub struct DatasetOptions {
    pub images_path: PathBuf,
    pub labels_path: PathBuf,
    pub dataset_path: PathBuf,
    pub class_file: PathBuf,
    pub manifest_path: PathBuf,
    pub train: Option<f64>,
    pub test: Option<f64>,
    pub val: Option<f64>,
    pub seed: u64,
    pub order: DiscoveryOrder,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            images_path: PathBuf::from("./images"),
            labels_path: PathBuf::from("./labels"),
            dataset_path: PathBuf::from("./dataset"),
            class_file: PathBuf::from("./classes.txt"),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            train: None,
            test: None,
            val: None,
            seed: DEFAULT_SEED,
            order: DiscoveryOrder::FileSystem,
        }
    }
}

/// Split the images and labels and lay them out as a YOLO dataset.
///
/// Stops at the first failure; whatever was created up to that point is left
/// on disk.
pub fn create_dataset(opts: &DatasetOptions) -> Result<ManifestOutcome, DatasetError> {
    let ratios = SplitRatios::from_options(opts.train, opts.test, opts.val)?;

    let classes = read_classes(&opts.class_file)?;

    let split_opts = SplitOptions {
        seed: opts.seed,
        order: opts.order,
    };
    let splits = split_images(&ratios, &opts.images_path, &opts.labels_path, &split_opts)?;

    create_dataset_paths(&opts.dataset_path)?;
    copy_contents(&opts.dataset_path, &opts.labels_path, &splits)?;

    let outcome = write_manifest_to(&opts.manifest_path, &opts.dataset_path, &classes)?;
    info!("Dataset created at {}", opts.dataset_path.display());
    Ok(outcome)
}
