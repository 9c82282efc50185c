//! File-backed document store.
//!
//! Keeps the `bands`, `likes` and `users` collections in memory and, when
//! opened on a directory, writes each changed collection back as a JSON
//! array (`bands.json`, `likes.json`, `users.json`).

mod atomic_io;
mod store;

use std::io;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::de::DeserializeOwned;

use atomic_io::write_atomic;
pub use store::LocalDocumentStore;

/// Failures reading or writing collection documents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentStoreError {
    /// The file system rejected a read or write.
    #[error("failed to access {path}: {message}")]
    Io { path: Utf8PathBuf, message: String },
    /// A document could not be parsed.
    #[error("failed to decode {path}: {message}")]
    Decode { path: Utf8PathBuf, message: String },
    /// A collection could not be serialised.
    #[error("failed to encode {path}: {message}")]
    Encode { path: Utf8PathBuf, message: String },
}

impl DocumentStoreError {
    pub(crate) fn io(path: &Utf8Path, message: impl ToString) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Create `path` if needed and open it as a capability directory.
pub(crate) fn open_data_dir(path: &Utf8Path) -> Result<Dir, DocumentStoreError> {
    Dir::create_ambient_dir_all(path, ambient_authority())
        .map_err(|err| DocumentStoreError::io(path, err))?;
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|err| DocumentStoreError::io(path, err))
}

/// Read a JSON array document; a missing file is an empty collection.
pub(crate) fn read_collection<T: DeserializeOwned>(
    dir: &Dir,
    file_name: &str,
) -> Result<Vec<T>, DocumentStoreError> {
    let path = Utf8Path::new(file_name);
    match dir.read_to_string(file_name) {
        Ok(contents) => {
            serde_json::from_str(&contents).map_err(|err| DocumentStoreError::Decode {
                path: path.to_path_buf(),
                message: err.to_string(),
            })
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(DocumentStoreError::io(path, err)),
    }
}

/// Serialise `records` and atomically replace `file_name`.
///
/// The file system work runs on the blocking pool.
pub(crate) async fn write_collection<T: serde::Serialize>(
    dir: &Arc<Dir>,
    file_name: &'static str,
    records: &[T],
) -> Result<(), DocumentStoreError> {
    let path = Utf8Path::new(file_name);
    let contents =
        serde_json::to_string_pretty(records).map_err(|err| DocumentStoreError::Encode {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    let dir = Arc::clone(dir);
    tokio::task::spawn_blocking(move || write_atomic(&dir, path, &contents))
        .await
        .map_err(|err| DocumentStoreError::io(path, format!("write task failed: {err}")))?
}
