use std::error::Error;
use std::fs::{self, File};
use std::path::Path;

use crate::error::ExperimentError;

pub(crate) fn ensure_not_empty<T>(items: &[T]) -> Result<(), ExperimentError> {
    if items.is_empty() {
        return Err(ExperimentError::NoResults);
    }

    Ok(())
}

pub(crate) fn create_output_file(path: impl AsRef<Path>) -> Result<File, ExperimentError> {
    Ok(File::create(path)?)
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<(), ExperimentError> {
    Ok(fs::create_dir_all(dir)?)
}

/// Runs a core parquet writer and tags its error with the output path.
pub(crate) fn parquet_result<F>(path: &Path, write_fn: F) -> Result<(), ExperimentError>
where
    F: FnOnce(&Path) -> Result<(), Box<dyn Error>>,
{
    write_fn(path).map_err(|error| ExperimentError::Parquet {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}
