//! # Filesystem-backed store
//!
//! [`FileStore`] keeps one file per key under a data directory, so a signed-in
//! session survives process restarts the way browser local storage does.
//!
//! ```text
//! <base_dir>/
//! ├── user.value            # JSON session record
//! └── selectedStyle.value   # raw style label
//! ```
//!
//! Writes go to `<key>.tmp` first and are renamed into place, so a crash never
//! leaves a half-written record behind.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::store::KeyValueStore;

/// Keys become file names, so only `[A-Za-z0-9_-]` is allowed.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Filesystem-backed key-value store.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn value_path(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(AppError::Internal(format!("invalid store key: {:?}", key)));
        }
        Ok(self.base.join(format!("{}.value", key)))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key)?;
        tokio::fs::create_dir_all(&self.base).await?;

        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, value).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::debug!("Stored {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.value_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
