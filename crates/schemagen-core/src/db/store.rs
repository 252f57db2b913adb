use crate::{db::SchemaDatabase, schema::error::ErrorTree};
use derive_more::Display;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// DatabaseError
///

#[derive(Debug, ThisError)]
pub enum DatabaseError {
    #[error("schema database '{}' is read-only; make it writable to continue", .0.display())]
    ReadOnly(PathBuf),

    #[error("schema database '{}' is inconsistent:\n{errors}", .path.display())]
    Corrupt { path: PathBuf, errors: ErrorTree },

    #[error("failed to {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to encode schema database: {0}")]
    Encode(#[from] serde_json::Error),
}

impl DatabaseError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

///
/// ResetReason
/// why a pass started from a fresh database
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum ResetReason {
    #[display("no database on disk")]
    Missing,

    #[display("database could not be read: {_0}")]
    Unreadable(String),

    #[display("database predates persistent id allocation")]
    Stale,

    #[display("reset requested")]
    Requested,
}

///
/// LoadOutcome
///

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(SchemaDatabase),
    Reset(ResetReason),
}

impl LoadOutcome {
    /// The database to start the pass from.
    #[must_use]
    pub fn into_database(self) -> SchemaDatabase {
        match self {
            Self::Loaded(db) => db,
            Self::Reset(_) => SchemaDatabase::fresh(),
        }
    }

    #[must_use]
    pub const fn is_reset(&self) -> bool {
        matches!(self, Self::Reset(_))
    }
}

///
/// DatabaseStore
///
/// The file a database lives in. Saves go through a sibling temporary file
/// and a rename, so a failed save leaves the previous file untouched.
///

#[derive(Clone, Debug)]
pub struct DatabaseStore {
    path: PathBuf,
}

impl DatabaseStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        fs::metadata(&self.path).is_ok_and(|meta| meta.permissions().readonly())
    }

    /// Load the database, or report why the pass has to start fresh.
    ///
    /// A read-only or internally inconsistent database is an error: the
    /// first would fail at save time after all the work was done, and the
    /// second cannot be trusted to not hand out an id twice.
    pub fn load(&self) -> Result<LoadOutcome, DatabaseError> {
        if !self.exists() {
            return Ok(LoadOutcome::Reset(ResetReason::Missing));
        }
        if self.is_read_only() {
            return Err(DatabaseError::ReadOnly(self.path.clone()));
        }

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => return Ok(LoadOutcome::Reset(ResetReason::Unreadable(e.to_string()))),
        };
        let db: SchemaDatabase = match serde_json::from_slice(&bytes) {
            Ok(db) => db,
            Err(e) => return Ok(LoadOutcome::Reset(ResetReason::Unreadable(e.to_string()))),
        };

        if db.is_stale() {
            return Ok(LoadOutcome::Reset(ResetReason::Stale));
        }

        db.check_integrity()
            .map_err(|errors| DatabaseError::Corrupt {
                path: self.path.clone(),
                errors,
            })?;

        Ok(LoadOutcome::Loaded(db))
    }

    /// Atomically replace the file with `db`.
    pub fn save(&self, db: &SchemaDatabase) -> Result<(), DatabaseError> {
        if self.is_read_only() {
            return Err(DatabaseError::ReadOnly(self.path.clone()));
        }

        let mut bytes = serde_json::to_vec_pretty(db)?;
        bytes.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DatabaseError::io("create", parent, e))?;
        }

        let tmp = self.tmp_path();
        if let Err(e) = write_synced(&tmp, &bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(DatabaseError::io("write", &tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(DatabaseError::io("replace", &self.path, e));
        }

        Ok(())
    }

    /// Remove the file. Used by explicit resets; a missing file is fine.
    pub fn delete(&self) -> Result<(), DatabaseError> {
        if !self.exists() {
            return Ok(());
        }
        if self.is_read_only() {
            return Err(DatabaseError::ReadOnly(self.path.clone()));
        }

        fs::remove_file(&self.path).map_err(|e| DatabaseError::io("delete", &self.path, e))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");

        self.path.with_file_name(name)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

///
/// TESTS
///
