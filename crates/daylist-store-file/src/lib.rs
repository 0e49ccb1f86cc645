//! File-backed key-value storage for daylist.

mod error;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use daylist_app::KeyValueStore;
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub use error::FileStoreError;

const FILE_EXTENSION: &str = "json";

/// Storage keeping one `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the data directory.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, FileStoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| FileStoreError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    /// Directory holding the value files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    /// Returns [`FileStoreError::InvalidKey`] unless the key is a non-empty run of
    /// ASCII letters, digits, `-` or `_`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, FileStoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(FileStoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    type Error = FileStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(path = %path.display(), bytes = contents.len(), "Read value");
                Ok(Some(contents))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FileStoreError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Replace the file atomically: write a sibling temp file, then rename it over.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        let io_error = |source| FileStoreError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_error)?;
        tmp.write_all(value.as_bytes()).map_err(io_error)?;
        tmp.as_file().sync_all().map_err(io_error)?;
        tmp.persist(&path).map_err(|source| FileStoreError::Persist {
            path: path.display().to_string(),
            source,
        })?;

        info!(path = %path.display(), bytes = value.len(), "Wrote value");
        Ok(())
    }
}
