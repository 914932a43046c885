//! Train/test/val partitioning of an image collection.
//!
//! Images are discovered in a flat directory, checked against the label
//! directory for count parity, shuffled with a seeded RNG and sliced into the
//! three splits.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use walkdir::WalkDir;

use crate::error::DatasetError;

/// Image extensions picked up during discovery. Matching is case-sensitive.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["bmp", "jpg", "jpeg", "png", "tif", "tiff", "dng"];

/// Extension of YOLO label files.
pub const LABEL_EXTENSION: &str = "txt";

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 59;

/// One of the three output partitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Split {
    Train,
    Test,
    Val,
}

impl Split {
    /// All splits, in the order they appear in a [`SplitAssignment`].
    pub const ALL: [Split; 3] = [Split::Train, Split::Test, Split::Val];

    /// Directory name used for this split.
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
            Split::Val => "val",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated split ratios.
///
/// The three ratios must sum to exactly `1.0` (no tolerance) and the train
/// ratio must be positive. Note that some intuitive triples such as
/// `(0.7, 0.2, 0.1)` do not sum to exactly one in floating point and are
/// rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitRatios {
    train: f64,
    test: f64,
    val: f64,
}

impl SplitRatios {
    /// Validate and build a ratio triple.
    pub fn new(train: f64, test: f64, val: f64) -> Result<Self, DatasetError> {
        let sum = train + test + val;
        if sum != 1.0 {
            return Err(DatasetError::InvalidRatioSum { sum }.logged());
        }

        if train <= 0.0 {
            return Err(DatasetError::InvalidTrainRatio { ratio: train }.logged());
        }

        for (split, ratio) in [(Split::Test, test), (Split::Val, val)] {
            if ratio < 0.0 {
                return Err(DatasetError::NegativeRatio { split, ratio }.logged());
            }
        }

        Ok(Self { train, test, val })
    }

    /// Build ratios from optional values, failing on the first one missing.
    pub fn from_options(
        train: Option<f64>,
        test: Option<f64>,
        val: Option<f64>,
    ) -> Result<Self, DatasetError> {
        let mut values = [0.0; 3];
        for (slot, (split, ratio)) in values
            .iter_mut()
            .zip([(Split::Train, train), (Split::Test, test), (Split::Val, val)])
        {
            *slot = ratio.ok_or_else(|| DatasetError::MissingRatio { split }.logged())?;
        }

        Self::new(values[0], values[1], values[2])
    }

    pub fn train(&self) -> f64 {
        self.train
    }

    pub fn test(&self) -> f64 {
        self.test
    }

    pub fn val(&self) -> f64 {
        self.val
    }
}

/// Number of images each split receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitCounts {
    pub train: usize,
    pub test: usize,
    pub val: usize,
}

/// Compute per-split counts for `n` images.
///
/// Each count is `floor(n * ratio)`; whatever the flooring leaves over is
/// added to train. Test and val never receive the remainder.
pub fn split_counts(n: usize, ratios: &SplitRatios) -> SplitCounts {
    let floor = |ratio: f64| (n as f64 * ratio).floor() as usize;

    let val = floor(ratios.val()).min(n);
    let test = floor(ratios.test()).min(n - val);

    SplitCounts {
        train: n - test - val,
        test,
        val,
    }
}

/// Mapping from split to the image files assigned to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitAssignment {
    files: BTreeMap<Split, Vec<PathBuf>>,
}

impl SplitAssignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the files for a split, replacing any previous entry.
    pub fn insert(&mut self, split: Split, files: Vec<PathBuf>) {
        self.files.insert(split, files);
    }

    /// Files assigned to `split`, if the split is present.
    pub fn get(&self, split: Split) -> Option<&[PathBuf]> {
        self.files.get(&split).map(Vec::as_slice)
    }

    /// Iterates over the present splits in train, test, val order.
    pub fn iter(&self) -> impl Iterator<Item = (Split, &[PathBuf])> {
        self.files.iter().map(|(split, files)| (*split, files.as_slice()))
    }

    /// Total number of files across all splits.
    pub fn total(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}

/// How discovered files are ordered before shuffling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiscoveryOrder {
    /// Directory enumeration order, grouped by extension.
    #[default]
    FileSystem,
    /// Sorted by path.
    Sorted,
}

/// Options for [`split_images`].
#[derive(Clone, Copy, Debug)]
pub struct SplitOptions {
    pub seed: u64,
    pub order: DiscoveryOrder,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            order: DiscoveryOrder::FileSystem,
        }
    }
}

/// Discover images and labels and partition the images into splits.
///
/// Only the image and label *counts* are compared; stems are not matched
/// here. A dataset with equally many but mismatched files fails later, when
/// the label for an image cannot be found at copy time.
///
/// With [`DiscoveryOrder::FileSystem`] the result depends on the order in
/// which the filesystem lists directory entries, so the same seed can give a
/// different split on another machine. Use [`DiscoveryOrder::Sorted`] for a
/// split that only depends on file names.
pub fn split_images(
    ratios: &SplitRatios,
    images_path: &Path,
    labels_path: &Path,
    opts: &SplitOptions,
) -> Result<SplitAssignment, DatasetError> {
    info!(
        "Started image splitting with parameters: train ratio: {}, test ratio: {}, val ratio: {}, images path: {}, labels path: {}, seed: {}",
        ratios.train(),
        ratios.test(),
        ratios.val(),
        images_path.display(),
        labels_path.display(),
        opts.seed
    );

    let images = discover_images(images_path, opts.order)?;
    let labels = discover_labels(labels_path, opts.order)?;

    if images.len() != labels.len() {
        return Err(DatasetError::CountMismatch {
            images: images.len(),
            labels: labels.len(),
        }
        .logged());
    }

    let assignment = partition(images, ratios, opts.seed);
    info!(
        "New dataset split counts: train: {}, val: {}, test: {}",
        assignment.get(Split::Train).map_or(0, <[_]>::len),
        assignment.get(Split::Val).map_or(0, <[_]>::len),
        assignment.get(Split::Test).map_or(0, <[_]>::len),
    );

    Ok(assignment)
}

/// Shuffle `images` with a seeded RNG and slice them into splits.
///
/// Slicing runs train, then val, then test: train takes the first
/// `counts.train` items, val the next `counts.val`, test the rest.
pub fn partition(mut images: Vec<PathBuf>, ratios: &SplitRatios, seed: u64) -> SplitAssignment {
    let mut rng = StdRng::seed_from_u64(seed);
    images.shuffle(&mut rng);

    let counts = split_counts(images.len(), ratios);

    let test = images.split_off(counts.train + counts.val);
    let val = images.split_off(counts.train);
    let train = images;

    let mut assignment = SplitAssignment::new();
    assignment.insert(Split::Train, train);
    assignment.insert(Split::Test, test);
    assignment.insert(Split::Val, val);
    assignment
}

/// List image files directly inside `dir`.
pub fn discover_images(dir: &Path, order: DiscoveryOrder) -> Result<Vec<PathBuf>, DatasetError> {
    collect_files_with_extensions(dir, &IMAGE_EXTENSIONS, order)
}

/// List label files directly inside `dir`.
pub fn discover_labels(dir: &Path, order: DiscoveryOrder) -> Result<Vec<PathBuf>, DatasetError> {
    collect_files_with_extensions(dir, &[LABEL_EXTENSION], order)
}

fn collect_files_with_extensions(
    root: &Path,
    extensions: &[&str],
    order: DiscoveryOrder,
) -> Result<Vec<PathBuf>, DatasetError> {
    if !root.is_dir() {
        return Err(DatasetError::DirectoryNotFound {
            path: root.to_path_buf(),
        }
        .logged());
    }

    let mut files: Vec<(usize, PathBuf)> = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| {
            DatasetError::Traversal {
                path: root.to_path_buf(),
                message: format!("failed while traversing directory: {source}"),
            }
            .logged()
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(index) = extension_index(entry.path(), extensions) {
            files.push((index, entry.path().to_path_buf()));
        }
    }

    match order {
        // Stable, so enumeration order survives within each extension.
        DiscoveryOrder::FileSystem => files.sort_by_key(|(index, _)| *index),
        DiscoveryOrder::Sorted => files.sort_by(|a, b| a.1.cmp(&b.1)),
    }

    Ok(files.into_iter().map(|(_, path)| path).collect())
}

fn extension_index(path: &Path, allowed: &[&str]) -> Option<usize> {
    let ext = path.extension().and_then(|ext| ext.to_str())?;
    allowed.iter().position(|allowed_ext| *allowed_ext == ext)
}
