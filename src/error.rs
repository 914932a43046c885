use std::path::PathBuf;
use thiserror::Error;

use crate::split::Split;

/// Broad classes of failure, used by callers that only care about the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input values: ratios, file counts, split keys.
    Validation,
    /// A required file or directory does not exist.
    NotFound,
    /// Creating, copying, or writing something on disk failed.
    FileSystem,
}

/// The main error type for yolosplit operations.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("{split} ratio is not set")]
    MissingRatio { split: Split },

    #[error(
        "Invalid ratio sum ({sum}). Sum of train, test and val ratios should be equal to one"
    )]
    InvalidRatioSum { sum: f64 },

    #[error("Invalid train ratio: {ratio}. Train ratio cannot be less than or equal to 0")]
    InvalidTrainRatio { ratio: f64 },

    #[error("Invalid {split} ratio: {ratio}. Ratios cannot be negative")]
    NegativeRatio { split: Split, ratio: f64 },

    #[error(
        "Number of images ({images}) is not equal to the number of labels ({labels}). \
         Check the dataset for unlabeled images before proceeding"
    )]
    CountMismatch { images: usize, labels: usize },

    #[error("Missing split: {split}")]
    MissingSplit { split: Split },

    #[error("Class file not found: {}", path.display())]
    ClassFileNotFound { path: PathBuf },

    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list {}: {message}", path.display())]
    Traversal { path: PathBuf, message: String },

    #[error("Failed to serialize manifest for {}: {source}", path.display())]
    ManifestSerialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to set up logging to {}: {message}", path.display())]
    Logging { path: PathBuf, message: String },
}

impl DatasetError {
    /// Which part of the error taxonomy this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            DatasetError::MissingRatio { .. }
            | DatasetError::InvalidRatioSum { .. }
            | DatasetError::InvalidTrainRatio { .. }
            | DatasetError::NegativeRatio { .. }
            | DatasetError::CountMismatch { .. }
            | DatasetError::MissingSplit { .. } => ErrorCategory::Validation,
            DatasetError::ClassFileNotFound { .. }
            | DatasetError::DirectoryNotFound { .. }
            | DatasetError::SourceNotFound { .. } => ErrorCategory::NotFound,
            DatasetError::Io { .. }
            | DatasetError::Traversal { .. }
            | DatasetError::ManifestSerialize { .. }
            | DatasetError::Logging { .. } => ErrorCategory::FileSystem,
        }
    }

    /// Log the error at error level and hand it back, for use at raise sites.
    pub(crate) fn logged(self) -> Self {
        tracing::error!("{self}");
        self
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
        .logged()
    }
}
