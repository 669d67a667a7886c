//! Atomic, backup-protected persistence of a whole collection.
//!
//! A save writes the full collection to `<file>.tmp`, flushes it to disk,
//! copies the current primary file to `<file>.bak`, and renames the temp
//! file over the primary. The primary path therefore always holds either
//! the previous complete content or the new complete content.
//!
//! A load that finds unparsable content restores the backup over the
//! primary and tries exactly once more. When that is impossible the data is
//! reported lost and an empty collection is returned; load never panics.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::{ErrorKind, PayrollError, PayrollResult};

/// Converts a whole collection to and from its on-disk text form.
pub trait RecordCodec {
    /// The element type of the collection.
    type Item;

    /// Encodes the full collection.
    fn encode(&self, items: &[Self::Item]) -> PayrollResult<String>;

    /// Decodes the full collection.
    ///
    /// Malformed content must be reported as an error whose
    /// [`kind`](PayrollError::kind) is [`ErrorKind::Corruption`].
    fn decode(&self, source: &str, content: &str) -> PayrollResult<Vec<Self::Item>>;
}

/// How a [`DurableStore::load`] obtained its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The primary file parsed cleanly.
    Loaded,
    /// There was no primary file; the collection is empty.
    NotFound,
    /// The primary file was corrupt and the backup was restored over it.
    RecoveredFromBackup,
    /// The primary file was corrupt and no usable backup existed; the
    /// collection is empty.
    DataLost,
}

/// The collection returned by a load, with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    /// The loaded items.
    pub items: Vec<T>,
    /// How they were obtained.
    pub outcome: LoadOutcome,
}

impl<T> Loaded<T> {
    fn empty(outcome: LoadOutcome) -> Self {
        Self {
            items: Vec::new(),
            outcome,
        }
    }
}

/// A file-backed collection store.
#[derive(Debug, Clone)]
pub struct DurableStore<C> {
    path: PathBuf,
    backup_path: PathBuf,
    temp_path: PathBuf,
    codec: C,
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

impl<C: RecordCodec> DurableStore<C> {
    /// Creates a store for the primary file `path`.
    pub fn new(path: impl Into<PathBuf>, codec: C) -> Self {
        let path = path.into();
        Self {
            backup_path: with_suffix(&path, ".bak"),
            temp_path: with_suffix(&path, ".tmp"),
            path,
            codec,
        }
    }

    /// The primary file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The backup file, refreshed before every replace.
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Replaces the stored collection with `items`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if any step fails; the primary file is then untouched
    /// and the temp file is removed.
    pub fn save(&self, items: &[C::Item]) -> PayrollResult<()> {
        let content = self.codec.encode(items)?;

        if let Err(err) = self.replace_primary(&content) {
            let _ = fs::remove_file(&self.temp_path);
            error!(path = %self.path.display(), error = %err, "Failed to save data");
            return Err(err);
        }

        info!(path = %self.path.display(), records = items.len(), "Saved data");
        Ok(())
    }

    fn replace_primary(&self, content: &str) -> PayrollResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
        }

        let mut file = File::create(&self.temp_path).map_err(|e| io_error(&self.temp_path, e))?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| io_error(&self.temp_path, e))?;
        drop(file);

        if self.path.exists() {
            fs::copy(&self.path, &self.backup_path).map_err(|e| io_error(&self.backup_path, e))?;
        }

        fs::rename(&self.temp_path, &self.path).map_err(|e| io_error(&self.path, e))
    }

    /// Loads the stored collection.
    ///
    /// # Errors
    ///
    /// Returns `Io` only when the primary file exists but cannot be read.
    /// Missing and corrupt files are reported through [`LoadOutcome`].
    pub fn load(&self) -> PayrollResult<Loaded<C::Item>> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "No data found, starting empty");
            return Ok(Loaded::empty(LoadOutcome::NotFound));
        }

        match self.read_and_decode() {
            Ok(items) => {
                info!(path = %self.path.display(), records = items.len(), "Loaded data");
                Ok(Loaded {
                    items,
                    outcome: LoadOutcome::Loaded,
                })
            }
            Err(err) if err.kind() == ErrorKind::Corruption => Ok(self.recover(&err)),
            Err(err) => Err(err),
        }
    }

    fn recover(&self, cause: &PayrollError) -> Loaded<C::Item> {
        warn!(path = %self.path.display(), error = %cause, "Data file is corrupt, restoring backup");

        if !self.backup_path.exists() {
            error!(path = %self.path.display(), "No backup available, data lost");
            return Loaded::empty(LoadOutcome::DataLost);
        }

        if let Err(err) = fs::copy(&self.backup_path, &self.path) {
            error!(path = %self.path.display(), error = %err, "Failed to restore backup, data lost");
            return Loaded::empty(LoadOutcome::DataLost);
        }

        match self.read_and_decode() {
            Ok(items) => {
                warn!(path = %self.path.display(), records = items.len(), "Recovered data from backup");
                Loaded {
                    items,
                    outcome: LoadOutcome::RecoveredFromBackup,
                }
            }
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "Backup is unusable, data lost");
                Loaded::empty(LoadOutcome::DataLost)
            }
        }
    }

    fn read_and_decode(&self) -> PayrollResult<Vec<C::Item>> {
        let source = self.path.display().to_string();
        let bytes = fs::read(&self.path).map_err(|e| io_error(&self.path, e))?;
        let content = String::from_utf8(bytes).map_err(|e| PayrollError::Corruption {
            path: source.clone(),
            message: e.to_string(),
        })?;
        self.codec.decode(&source, &content)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PayrollError {
    PayrollError::io(path.display().to_string(), source)
}
