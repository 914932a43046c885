//! Class list loading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::info;

use crate::error::DatasetError;

/// Read class names from a text file, one per line.
///
/// The position of each name is its numeric class id. Trailing whitespace is
/// stripped; blank lines are kept as empty names so ids stay aligned with
/// line numbers. `\n`, `\r\n` and a lone `\r` all end a line.
pub fn read_classes(path: &Path) -> Result<Vec<String>, DatasetError> {
    let data = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => DatasetError::ClassFileNotFound {
            path: path.to_path_buf(),
        }
        .logged(),
        _ => DatasetError::io(path, source),
    })?;

    let classes: Vec<String> = data
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect();

    info!("Read classes: {:?}", classes);
    Ok(classes)
}
