//! JSON file read and atomic write helpers.
//!
//! # Responsibility
//! - Read whole JSON documents, treating a missing collection file as empty.
//! - Stage pretty-printed JSON in a sibling temp file and rename it into place.
//!
//! # Invariants
//! - Temp files live in the destination directory, so the rename never
//!   crosses filesystems.
//! - A failed or abandoned write removes its temp file and leaves the
//!   destination bytes untouched.

use crate::store::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const TEMP_PREFIX: &str = ".pkms-";
const TEMP_SUFFIX: &str = ".tmp";

/// Reads a JSON document, returning `T::default()` when the file is missing.
///
/// # Errors
/// - `Io` for any read failure other than not-found.
/// - `MalformedStorage` when the file exists but fails to parse.
pub fn read_json_or_default<T>(path: &Path) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    match fs::read(path) {
        Ok(bytes) => parse_json(path, &bytes),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(StoreError::io(path, err)),
    }
}

/// Reads a JSON document that must exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let bytes = fs::read(path).map_err(|err| StoreError::io(path, err))?;
    parse_json(path, &bytes)
}

fn parse_json<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::MalformedStorage {
        path: path.to_path_buf(),
        source,
    })
}

/// A fully written temp file waiting to be renamed over its destination.
///
/// Dropping a `StagedWrite` without calling [`StagedWrite::commit`] deletes the
/// temp file.
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    destination: PathBuf,
}

impl StagedWrite {
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Atomically renames the staged file over the destination.
    pub fn commit(self) -> StoreResult<()> {
        let Self { temp, destination } = self;
        // On failure the returned PersistError owns the temp file and removes it on drop.
        temp.persist(&destination)
            .map_err(|err| StoreError::io(&destination, err.error))?;
        Ok(())
    }
}

/// Writes `value` as pretty JSON into a temp file next to `destination`.
pub fn stage_json<T>(destination: &Path, value: &T) -> StoreResult<StagedWrite>
where
    T: Serialize + ?Sized,
{
    let dir = parent_dir(destination);
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|err| StoreError::io(destination, io::Error::from(err)))?;

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(|err| StoreError::io(dir, err))?;
    if let Err(err) = write_synced(&mut temp, &bytes) {
        return Err(StoreError::io(temp.path(), err));
    }

    Ok(StagedWrite {
        temp,
        destination: destination.to_path_buf(),
    })
}

/// Stages and commits `value` in one step.
pub fn write_json_atomic<T>(destination: &Path, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
{
    stage_json(destination, value)?.commit()
}

/// Writes `value` as pretty JSON directly to `path`, truncating any existing file.
///
/// Not atomic: an interrupted write can leave a partial file behind.
pub fn write_json_in_place<T>(path: &Path, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
{
    let file = File::create(path).map_err(|err| StoreError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|err| StoreError::io(path, io::Error::from(err)))?;
    writer.flush().map_err(|err| StoreError::io(path, err))
}

fn write_synced(temp: &mut NamedTempFile, bytes: &[u8]) -> io::Result<()> {
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.as_file().sync_all()
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
