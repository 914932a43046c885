//! Copying images and labels into the split directories.

use std::ffi::OsString;
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::error::DatasetError;
use crate::split::{Split, SplitAssignment, LABEL_EXTENSION};

/// Copy every image in `splits`, and the label sharing its stem, into
/// `<dataset_root>/{images,labels}/<split>/`.
///
/// The destination tree must already exist. The first missing source file
/// aborts the run; files copied before it stay in place.
pub fn copy_contents(
    dataset_root: &Path,
    labels_path: &Path,
    splits: &SplitAssignment,
) -> Result<(), DatasetError> {
    for split in Split::ALL {
        if splits.get(split).is_none() {
            return Err(DatasetError::MissingSplit { split }.logged());
        }
    }

    for (split, images) in splits.iter() {
        let images_dir = dataset_root.join("images").join(split.as_str());
        let labels_dir = dataset_root.join("labels").join(split.as_str());

        let progress = split_progress(split, images.len());
        for image in images {
            let label = label_for_image(labels_path, image)?;
            copy_file(image, &images_dir)?;
            copy_file(&label, &labels_dir)?;
            progress.inc(1);
        }
        progress.finish();

        info!("Copied {} file pair(s) into the {} split", images.len(), split);
    }

    info!("Successfully copied all files into the target directories");
    Ok(())
}

/// Path of the label for `image`: same stem, `.txt`, inside `labels_path`.
pub fn label_for_image(labels_path: &Path, image: &Path) -> Result<PathBuf, DatasetError> {
    let stem = image.file_stem().ok_or_else(|| {
        DatasetError::SourceNotFound {
            path: image.to_path_buf(),
        }
        .logged()
    })?;

    let mut name = OsString::from(stem);
    name.push(".");
    name.push(LABEL_EXTENSION);
    Ok(labels_path.join(name))
}

/// Per-split bar drawn on stderr; indicatif hides it when stderr is not a
/// terminal.
fn split_progress(split: Split, len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{msg:>5} [{bar:40.cyan/blue}] {pos}/{len} files ({elapsed})")
    {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar.set_message(split.as_str());
    bar
}

/// Copy `src` into `dest_dir` under its own file name, carrying over the
/// access and modification times when the platform reports them.
fn copy_file(src: &Path, dest_dir: &Path) -> Result<(), DatasetError> {
    let name = match src.file_name() {
        Some(name) if src.is_file() => name,
        _ => {
            return Err(DatasetError::SourceNotFound {
                path: src.to_path_buf(),
            }
            .logged())
        }
    };
    let dest = dest_dir.join(name);

    fs::copy(src, &dest).map_err(|source| DatasetError::io(&dest, source))?;

    let metadata = fs::metadata(src).map_err(|source| DatasetError::io(src, source))?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }

    // Read-only handle: `fs::copy` carries permission bits over.
    File::open(&dest)
        .and_then(|file| file.set_times(times))
        .map_err(|source| DatasetError::io(&dest, source))
}
