//! Disk tier: one file per key.
//!
//! File names are the key with every byte outside ASCII alphanumerics
//! written as `%XX`, so distinct keys never share a file. Writes land in a
//! temporary file that is renamed into place; readers see either the old
//! file, the new one, or nothing.

use crate::model::ImageError;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Escape `key` into a flat file name.
///
/// ```
/// # use reviews_feed::image_cache::disk::file_name;
/// assert_eq!(file_name("https://a.b/c.png"), "https%3A%2F%2Fa%2Eb%2Fc%2Epng");
/// ```
pub fn file_name(key: &str) -> String {
    utf8_percent_encode(key, NON_ALPHANUMERIC).to_string()
}

/// Directory-backed image byte store.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Store files under `dir`; the directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(file_name(key))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!(".{}.{}.tmp", file_name(key), Uuid::new_v4().simple()))
    }

    /// Read the bytes stored for `key`; `Ok(None)` when there is no file.
    pub async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ImageError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ImageError::Io(err.to_string())),
        }
    }

    /// Store `bytes` for `key`, replacing any previous file.
    pub async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ImageError> {
        let io = |err: std::io::Error| ImageError::Io(err.to_string());
        let temp = self.temp_path_for(key);

        tokio::fs::create_dir_all(&self.dir).await.map_err(io)?;
        tokio::fs::write(&temp, bytes).await.map_err(io)?;
        if let Err(err) = tokio::fs::rename(&temp, self.path_for(key)).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(io(err));
        }
        Ok(())
    }

    /// Blocking variant of [`DiskCache::write`] for callers without a runtime.
    pub fn write_blocking(&self, key: &str, bytes: &[u8]) -> Result<(), ImageError> {
        let io = |err: std::io::Error| ImageError::Io(err.to_string());
        let temp = self.temp_path_for(key);

        std::fs::create_dir_all(&self.dir).map_err(io)?;
        std::fs::write(&temp, bytes).map_err(io)?;
        if let Err(err) = std::fs::rename(&temp, self.path_for(key)) {
            let _ = std::fs::remove_file(&temp);
            return Err(io(err));
        }
        Ok(())
    }

    /// Start a write without waiting for it.
    ///
    /// Runs on the current Tokio runtime when there is one, otherwise on a
    /// detached thread. Failures are logged and dropped.
    pub fn spawn_write(&self, key: String, bytes: Arc<[u8]>) {
        let disk = self.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(err) = disk.write(&key, &bytes).await {
                        tracing::debug!(key = %key, error = %err, "disk cache write failed");
                    }
                });
            }
            Err(_) => {
                std::thread::spawn(move || {
                    if let Err(err) = disk.write_blocking(&key, &bytes) {
                        tracing::debug!(key = %key, error = %err, "disk cache write failed");
                    }
                });
            }
        }
    }
}
