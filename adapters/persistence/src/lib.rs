#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! File-backed save storage for Macan Run.
//!
//! Progress lives in a pretty-printed JSON document. Every overwrite first
//! copies the previous document to a backup beside it, and a primary that
//! fails to parse or validate is replaced by that backup on load.

mod document;

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use macan_run_core::{SaveRecord, SaveStore, SaveValidationError};
use serde::Serialize;
use thiserror::Error;

use document::DecodeError;

/// Directory created under the platform data directory.
pub const APP_DIR_NAME: &str = "MacanRun";
/// File name of the primary save.
pub const SAVE_FILE_NAME: &str = "save.json";
/// File name of the backup kept beside the primary save.
pub const BACKUP_FILE_NAME: &str = "save_backup.json";

/// Failures raised while reading or writing save files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// No save exists at the path.
    #[error("no save file at {0}")]
    NotFound(PathBuf),
    /// The platform exposes no per-user data directory.
    #[error("no local data directory is available on this platform")]
    NoDataDir,
    /// Reading, writing or copying a file failed.
    #[error("i/o failure on {path}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not well-formed JSON or does not match the record layout.
    #[error("{path} is not a readable save")]
    Json {
        /// File that was being decoded.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The file parsed but breaks a save rule.
    #[error("{path} failed validation")]
    Invalid {
        /// File that was being validated.
        path: PathBuf,
        /// First rule that failed.
        #[source]
        source: SaveValidationError,
    },
}

impl PersistenceError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    fn decode(path: &Path, error: DecodeError) -> Self {
        let path = path.to_path_buf();
        match error {
            DecodeError::Json(source) => Self::Json { path, source },
            DecodeError::Invalid(source) => Self::Invalid { path, source },
        }
    }

    /// Whether the error means the file content, not the file system, was bad.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Json { .. } | Self::Invalid { .. })
    }
}

/// Default primary save path: `<data-local>/MacanRun/save.json`.
pub fn default_location() -> Result<PathBuf, PersistenceError> {
    dirs::data_local_dir()
        .map(|base| base.join(APP_DIR_NAME).join(SAVE_FILE_NAME))
        .ok_or(PersistenceError::NoDataDir)
}

/// Summary of the primary save file for menus and diagnostics.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveInfo {
    /// No primary save exists.
    Missing {
        /// Where the save would live.
        path: PathBuf,
    },
    /// The save parsed as JSON; absent fields fall back to placeholders.
    Readable {
        /// Location of the save.
        path: PathBuf,
        /// File size in bytes.
        size: u64,
        /// Last modification in seconds since the Unix epoch, when known.
        modified: Option<u64>,
        /// Stored level name, or `"unknown"`.
        level: String,
        /// Stored score, or 0.
        score: u64,
        /// Stored coin count, or 0.
        coins: u64,
        /// Stored timestamp, or `"unknown"`.
        timestamp: String,
    },
    /// The save exists but could not be read.
    Unreadable {
        /// Location of the save.
        path: PathBuf,
        /// Description of the failure.
        error: String,
    },
}

/// [`SaveStore`] that keeps progress in a JSON file with a rolling backup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSaveStore {
    save_path: PathBuf,
    backup_path: PathBuf,
}

impl FileSaveStore {
    /// Uses the provided primary path with the backup in the same directory.
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        let save_path = save_path.into();
        let backup_path = save_path.parent().map_or_else(
            || PathBuf::from(BACKUP_FILE_NAME),
            |dir| dir.join(BACKUP_FILE_NAME),
        );
        Self {
            save_path,
            backup_path,
        }
    }

    /// Stores `save.json` and its backup inside the directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SAVE_FILE_NAME))
    }

    /// Uses the platform data directory.
    pub fn at_default_location() -> Result<Self, PersistenceError> {
        default_location().map(Self::new)
    }

    /// Path of the primary save.
    #[must_use]
    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Path of the backup copy.
    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Validates and writes the record, backing up any previous save first.
    ///
    /// A failed backup is logged and does not prevent the write.
    pub fn write(&self, record: &SaveRecord) -> Result<(), PersistenceError> {
        record
            .validate()
            .map_err(|source| PersistenceError::Invalid {
                path: self.save_path.clone(),
                source,
            })?;
        let text = serde_json::to_string_pretty(record).map_err(|source| {
            PersistenceError::Json {
                path: self.save_path.clone(),
                source,
            }
        })?;

        self.ensure_parent()?;
        self.backup_current();
        fs::write(&self.save_path, text)
            .map_err(|err| PersistenceError::io(&self.save_path, err))?;
        tracing::info!(path = %self.save_path.display(), level = %record.level, "save written");
        Ok(())
    }

    /// Reads the primary save, falling back to the backup when the primary
    /// is corrupt.
    ///
    /// A missing primary is reported as [`PersistenceError::NotFound`]; a
    /// corrupt primary without a backup keeps its own error.
    pub fn read(&self) -> Result<SaveRecord, PersistenceError> {
        match read_record(&self.save_path) {
            Err(err) if err.is_corrupt() => {
                tracing::warn!(error = %err, "save is corrupt, trying the backup");
                read_record(&self.backup_path).map_err(|backup_err| match backup_err {
                    PersistenceError::NotFound(_) => err,
                    other => other,
                })
            }
            other => other,
        }
    }

    /// Removes the primary save and its backup.
    ///
    /// Returns whether any file was deleted.
    pub fn delete(&self) -> Result<bool, PersistenceError> {
        let mut deleted = false;
        for path in [&self.save_path, &self.backup_path] {
            match fs::remove_file(path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "save file deleted");
                    deleted = true;
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(PersistenceError::io(path, err)),
            }
        }
        Ok(deleted)
    }

    /// Describes the primary save without validating it.
    #[must_use]
    pub fn info(&self) -> SaveInfo {
        let path = self.save_path.clone();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return SaveInfo::Missing { path };
            }
            Err(err) => {
                return SaveInfo::Unreadable {
                    path,
                    error: err.to_string(),
                }
            }
        };

        let document = fs::read_to_string(&path)
            .map_err(|err| err.to_string())
            .and_then(|text| {
                serde_json::from_str::<serde_json::Value>(&text).map_err(|err| err.to_string())
            });
        let document = match document {
            Ok(document) => document,
            Err(error) => return SaveInfo::Unreadable { path, error },
        };

        let text_field = |key: &str| {
            document
                .get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown")
                .to_owned()
        };
        let number_field = |key: &str| {
            document
                .get(key)
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(0)
        };

        SaveInfo::Readable {
            size: metadata.len(),
            modified: metadata
                .modified()
                .ok()
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map(|elapsed| elapsed.as_secs()),
            level: text_field("level"),
            score: number_field("score"),
            coins: number_field("coins"),
            timestamp: text_field("timestamp"),
            path,
        }
    }

    /// Copies the primary save to `destination`.
    pub fn export(&self, destination: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let destination = destination.as_ref();
        if !self.save_path.exists() {
            return Err(PersistenceError::NotFound(self.save_path.clone()));
        }
        let _ = fs::copy(&self.save_path, destination)
            .map_err(|err| PersistenceError::io(destination, err))?;
        tracing::info!(destination = %destination.display(), "save exported");
        Ok(())
    }

    /// Installs a save from `source` once it validates, backing up the
    /// current save first.
    pub fn import(&self, source: impl AsRef<Path>) -> Result<SaveRecord, PersistenceError> {
        let source = source.as_ref();
        let record = read_record(source)?;

        self.ensure_parent()?;
        self.backup_current();
        let _ = fs::copy(source, &self.save_path)
            .map_err(|err| PersistenceError::io(&self.save_path, err))?;
        tracing::info!(source = %source.display(), level = %record.level, "save imported");
        Ok(record)
    }

    fn ensure_parent(&self) -> Result<(), PersistenceError> {
        match self.save_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir).map_err(|err| PersistenceError::io(dir, err))
            }
            _ => Ok(()),
        }
    }

    fn backup_current(&self) {
        if !self.save_path.exists() {
            return;
        }
        match fs::copy(&self.save_path, &self.backup_path) {
            Ok(_) => tracing::debug!(path = %self.backup_path.display(), "backup created"),
            Err(err) => tracing::warn!(error = %err, "backup failed"),
        }
    }
}

fn read_record(path: &Path) -> Result<SaveRecord, PersistenceError> {
    let text = fs::read_to_string(path).map_err(|err| PersistenceError::io(path, err))?;
    document::decode(&text).map_err(|err| PersistenceError::decode(path, err))
}

impl SaveStore for FileSaveStore {
    fn save(&mut self, record: &SaveRecord) -> bool {
        match self.write(record) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "could not write save");
                false
            }
        }
    }

    fn load(&mut self) -> Option<SaveRecord> {
        match self.read() {
            Ok(record) => Some(record),
            Err(PersistenceError::NotFound(path)) => {
                tracing::debug!(path = %path.display(), "no save file");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not load save");
                None
            }
        }
    }
}
